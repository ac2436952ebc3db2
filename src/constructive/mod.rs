//! Constructive heuristics for initial tours.
//!
//! Local search only improves; something has to produce the starting
//! permutation. A seeded random shuffle gives an unbiased start for
//! benchmarking descent depth; nearest-neighbor gives a cheap warm start.

mod nearest_neighbor;
mod random;

pub use nearest_neighbor::nearest_neighbor_tour;
pub use random::random_tour;
