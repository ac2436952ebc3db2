//! Domain model types for the traveling salesman problem.
//!
//! Provides the core abstractions: cities with coordinates, and the tour —
//! a cyclic permutation of all cities with O(1) adjacency queries and the
//! segment primitives local search moves are built on.

mod city;
mod tour;

pub use city::City;
pub use tour::Tour;
