//! 2-opt edge exchange.
//!
//! # Algorithm
//!
//! For a pair of non-adjacent tour edges `(c1, c2)` at positions `(i, i+1)`
//! and `(c3, c4)` at positions `(j, j+1)`, the move replaces them with
//! `(c1, c3)` and `(c2, c4)`, reversing the segment between `c2` and `c3`:
//!
//! ```text
//! delta = d(c1, c3) + d(c2, c4) - d(c1, c2) - d(c3, c4)
//! ```
//!
//! The segment's internal edges keep their cost (the matrix is symmetric),
//! so the delta depends on exactly four distance lookups.
//!
//! # Complexity
//!
//! Full enumeration is O(n²) moves per sweep. With candidate lists it drops
//! to O(n·k) for list size k.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{Move, MoveKind};
use crate::distance::{CandidateLists, DistanceMatrix};
use crate::models::Tour;

/// Incremental cost change of the 2-opt move `(i, j)`.
///
/// Positions must satisfy `i + 2 <= j` and `(i, j) != (0, n-1)` so the two
/// removed edges share no city.
pub fn delta(tour: &Tour, distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let n = tour.len();
    let c1 = tour.city_at(i);
    let c2 = tour.city_at(i + 1);
    let c3 = tour.city_at(j);
    let c4 = tour.city_at((j + 1) % n);
    distances.get(c1, c3) + distances.get(c2, c4) - distances.get(c1, c2) - distances.get(c3, c4)
}

/// Enumerates every 2-opt move on the tour, scored.
///
/// Order is `(i, j)` lexicographic over non-adjacent edge pairs; the wrap
/// pair `(0, n-1)` is skipped because it only flips tour orientation.
/// Produces nothing for tours with fewer than 4 cities.
pub fn moves<'a>(
    tour: &'a Tour,
    distances: &'a DistanceMatrix,
) -> impl Iterator<Item = Move> + 'a {
    let n = tour.len();
    (0..n).flat_map(move |i| {
        let hi = if i == 0 { n.saturating_sub(1) } else { n };
        ((i + 2)..hi).map(move |j| Move {
            kind: MoveKind::TwoOpt { i, j },
            delta: delta(tour, distances, i, j),
        })
    })
}

/// Enumerates 2-opt moves restricted to nearest-neighbor candidate lists.
///
/// For each position `i` the only partners considered are the tour positions
/// of `c1`'s k nearest neighbors, on the rationale that an improving move
/// must create at least one short edge. A move reachable from both of its
/// endpoints appears twice in the stream; both occurrences carry the same
/// delta, so duplicates are harmless to every acceptance strategy.
pub fn candidate_moves<'a>(
    tour: &'a Tour,
    distances: &'a DistanceMatrix,
    candidates: &'a CandidateLists,
) -> impl Iterator<Item = Move> + 'a {
    let n = tour.len();
    (0..n).flat_map(move |p| {
        let c1 = tour.city_at(p);
        candidates.neighbors(c1).iter().filter_map(move |&c3| {
            let q = tour.position_of(c3);
            let (i, j) = if p < q { (p, q) } else { (q, p) };
            if j <= i + 1 || (i == 0 && j == n - 1) {
                return None;
            }
            Some(Move {
                kind: MoveKind::TwoOpt { i, j },
                delta: delta(tour, distances, i, j),
            })
        })
    })
}
