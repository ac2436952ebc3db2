//! Nearest-neighbor constructive heuristic.
//!
//! Builds a tour greedily: starting from city 0, always visit the nearest
//! unvisited city. Ties go to the lower id, keeping construction
//! deterministic for a fixed matrix.
//!
//! # Complexity
//!
//! O(n²).
//!
//! # Reference
//!
//! The simplest constructive heuristic for TSP. Solution quality is
//! typically 15-25% above optimal, which is exactly what a local search
//! warm start needs: cheap and structurally reasonable.

use crate::distance::DistanceMatrix;

/// Constructs a tour by repeatedly visiting the nearest unvisited city.
///
/// # Examples
///
/// ```
/// use tsp_ls::models::City;
/// use tsp_ls::distance::DistanceMatrix;
/// use tsp_ls::constructive::nearest_neighbor_tour;
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 1.0, 0.0),
///     City::new(2, 2.0, 0.0),
///     City::new(3, 3.0, 0.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities);
/// assert_eq!(nearest_neighbor_tour(&dm), vec![0, 1, 2, 3]);
/// ```
pub fn nearest_neighbor_tour(distances: &DistanceMatrix) -> Vec<usize> {
    let n = distances.size();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    tour.push(0);

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for city in 0..n {
            if visited[city] {
                continue;
            }
            let d = distances.get(current, city);
            let closer = match best {
                Some((_, bd)) => d < bd,
                None => true,
            };
            if closer {
                best = Some((city, d));
            }
        }
        let (next, _) = best.expect("unvisited city must exist");
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;

    fn line_matrix(n: usize) -> DistanceMatrix {
        let cities: Vec<City> = (0..n).map(|i| City::new(i, i as f64, 0.0)).collect();
        DistanceMatrix::from_cities(&cities)
    }

    #[test]
    fn test_line_instance_visits_in_order() {
        let dm = line_matrix(5);
        assert_eq!(nearest_neighbor_tour(&dm), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_tour_is_permutation() {
        let cities = vec![
            City::new(0, 5.0, 5.0),
            City::new(1, 0.0, 0.0),
            City::new(2, 10.0, 0.0),
            City::new(3, 0.0, 10.0),
            City::new(4, 10.0, 10.0),
        ];
        let dm = DistanceMatrix::from_cities(&cities);
        let mut tour = nearest_neighbor_tour(&dm);
        tour.sort_unstable();
        assert_eq!(tour, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_tie_goes_to_lower_id() {
        // Cities 1 and 2 equidistant from 0.
        let dm = DistanceMatrix::from_data(
            3,
            vec![
                0.0, 1.0, 1.0, //
                1.0, 0.0, 5.0, //
                1.0, 5.0, 0.0,
            ],
        )
        .expect("valid");
        assert_eq!(nearest_neighbor_tour(&dm), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_city() {
        let dm = line_matrix(1);
        assert_eq!(nearest_neighbor_tour(&dm), vec![0]);
    }

    #[test]
    fn test_empty() {
        let dm = DistanceMatrix::new(0);
        assert!(nearest_neighbor_tour(&dm).is_empty());
    }
}
