//! Random initial tour.

use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of cities `0..n`.
///
/// Deterministic for a fixed RNG state, so a seeded search run is fully
/// reproducible from its configuration.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use tsp_ls::constructive::random_tour;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let tour = random_tour(5, &mut rng);
/// let mut sorted = tour.clone();
/// sorted.sort_unstable();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
/// ```
pub fn random_tour<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(rng);
    tour
}
