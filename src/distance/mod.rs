//! Distance oracle.
//!
//! Provides a dense symmetric distance matrix and per-city nearest-neighbor
//! candidate lists for bounding neighborhood size.

mod candidates;
mod matrix;

pub use candidates::CandidateLists;
pub use matrix::DistanceMatrix;
