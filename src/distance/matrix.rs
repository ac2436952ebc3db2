//! Dense distance matrix.

use crate::error::ConfigError;
use crate::models::City;

/// A dense n×n distance matrix stored in row-major order.
///
/// Supports both Euclidean distance computation from city coordinates and
/// explicit distance specification. The search engine requires symmetry and
/// non-negative entries but makes no triangle-inequality assumption, so
/// arbitrary symmetric matrices work.
///
/// # Examples
///
/// ```
/// use tsp_ls::models::City;
/// use tsp_ls::distance::DistanceMatrix;
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 3.0, 4.0),
///     City::new(2, 6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from city coordinates.
    ///
    /// Entries are indexed by [`City::id`], not by slice position, so the
    /// cities may be supplied in any order. Ids must form a permutation of
    /// `0..n`; [`optimize`](crate::search::optimize) validates this before
    /// calling here.
    ///
    /// # Panics
    ///
    /// Panics if a city id is `n` or larger.
    pub fn from_cities(cities: &[City]) -> Self {
        let n = cities.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance_to(&cities[j]);
                dm.set(cities[i].id(), cities[j].id(), d);
                dm.set(cities[j].id(), cities[i].id(), d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns an error if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, ConfigError> {
        if data.len() != size * size {
            return Err(ConfigError::MatrixSizeMismatch {
                size,
                len: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Returns the distance between cities `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance between cities `from` and `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of cities in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Validates the distance-oracle contract: every entry finite and
    /// non-negative, and the matrix symmetric within `tol`.
    ///
    /// Called once before the search loop starts; the engine never
    /// re-validates during the run.
    pub fn validate(&self, tol: f64) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyInstance);
        }
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(ConfigError::InvalidDistance {
                        from: i,
                        to: j,
                        value: d,
                    });
                }
            }
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return Err(ConfigError::AsymmetricDistance { from: i, to: j });
                }
            }
        }
        Ok(())
    }
}
