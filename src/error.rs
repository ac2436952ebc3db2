//! Configuration and input validation errors.
//!
//! Every malformed input is rejected before the search loop starts. Once the
//! loop is running, no condition is fatal: budget exhaustion is a normal
//! termination path and cost drift is reconciled in place.

use thiserror::Error;

/// Rejection of a malformed instance or configuration.
///
/// # Examples
///
/// ```
/// use tsp_ls::error::ConfigError;
/// use tsp_ls::models::Tour;
///
/// let err = Tour::new(vec![0, 1, 1]).unwrap_err();
/// assert_eq!(err, ConfigError::DuplicateCity(1));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The instance contains no cities.
    #[error("instance has no cities")]
    EmptyInstance,

    /// A city id appears more than once in a tour or city list.
    #[error("duplicate city id {0}")]
    DuplicateCity(usize),

    /// A city id expected in `0..n` is absent.
    #[error("missing city id {0}")]
    MissingCity(usize),

    /// A city id lies outside the valid range `0..n`.
    #[error("city id {id} out of range for instance of size {n}")]
    CityIdOutOfRange {
        /// The offending id.
        id: usize,
        /// Instance size.
        n: usize,
    },

    /// A city coordinate is NaN or infinite.
    #[error("non-finite coordinate for city {0}")]
    NonFiniteCoordinate(usize),

    /// Explicit matrix data does not match the declared size.
    #[error("distance data length {len} does not match size {size}x{size}")]
    MatrixSizeMismatch {
        /// Declared matrix dimension.
        size: usize,
        /// Provided data length.
        len: usize,
    },

    /// A distance entry is negative or non-finite.
    #[error("invalid distance {value} between {from} and {to}")]
    InvalidDistance {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
        /// The offending entry.
        value: f64,
    },

    /// `d(a, b)` and `d(b, a)` differ beyond tolerance.
    #[error("asymmetric distance between {from} and {to}")]
    AsymmetricDistance {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
    },

    /// A recognized option carries an invalid value.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
