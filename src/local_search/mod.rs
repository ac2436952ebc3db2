//! Local search neighborhoods for TSP tours.
//!
//! - [`two_opt`] — edge-exchange moves (segment reversal)
//! - [`or_opt`] — segment relocation moves
//!
//! Each generator produces a lazy, finite, restartable stream of [`Move`]s
//! for the current tour. A move is declarative: it names the tour positions
//! it affects and carries its precomputed cost delta, but nothing changes
//! until [`apply_move`] commits it. Enumeration order is deterministic for a
//! fixed tour and candidate-list ordering.

use crate::distance::{CandidateLists, DistanceMatrix};
use crate::models::Tour;
use serde::{Deserialize, Serialize};

pub mod or_opt;
pub mod two_opt;

/// Deltas above `-EPS` are treated as non-improving to keep float noise from
/// driving endless zero-gain cycling.
pub(crate) const EPS: f64 = 1e-10;

/// A candidate transformation of the current tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveKind {
    /// Replace edges `(t[i], t[i+1])` and `(t[j], t[j+1])` with
    /// `(t[i], t[j])` and `(t[i+1], t[j+1])`, reversing positions `i+1..=j`.
    TwoOpt {
        /// Position of the first removed edge's tail.
        i: usize,
        /// Position of the second removed edge's tail; `i + 2 <= j`.
        j: usize,
    },
    /// Relocate the segment at positions `start..start + len` so it follows
    /// the city at position `dest`, optionally reversed.
    OrOpt {
        /// First tour position of the segment.
        start: usize,
        /// Segment length, 1..=3.
        len: usize,
        /// Tour position the segment is inserted after.
        dest: usize,
        /// Whether the segment is reinserted in reverse order.
        reversed: bool,
    },
}

impl MoveKind {
    /// City pairs of the tour edges this move removes, normalized low-high.
    ///
    /// The positions refer to the tour *before* the move is applied. Tabu
    /// memory is keyed on these pairs.
    pub fn removed_edges(&self, tour: &Tour) -> Vec<(usize, usize)> {
        let n = tour.len();
        match *self {
            MoveKind::TwoOpt { i, j } => {
                let c1 = tour.city_at(i);
                let c2 = tour.city_at(i + 1);
                let c3 = tour.city_at(j);
                let c4 = tour.city_at((j + 1) % n);
                vec![edge(c1, c2), edge(c3, c4)]
            }
            MoveKind::OrOpt {
                start, len, dest, ..
            } => {
                let p = tour.city_at((start + n - 1) % n);
                let a = tour.city_at((start + len) % n);
                let first = tour.city_at(start);
                let last = tour.city_at(start + len - 1);
                let q = tour.city_at(dest);
                let r = tour.city_at((dest + 1) % n);
                vec![edge(p, first), edge(last, a), edge(q, r)]
            }
        }
    }

    /// City pairs of the tour edges this move adds, normalized low-high.
    pub fn added_edges(&self, tour: &Tour) -> Vec<(usize, usize)> {
        let n = tour.len();
        match *self {
            MoveKind::TwoOpt { i, j } => {
                let c1 = tour.city_at(i);
                let c2 = tour.city_at(i + 1);
                let c3 = tour.city_at(j);
                let c4 = tour.city_at((j + 1) % n);
                vec![edge(c1, c3), edge(c2, c4)]
            }
            MoveKind::OrOpt {
                start,
                len,
                dest,
                reversed,
            } => {
                let p = tour.city_at((start + n - 1) % n);
                let a = tour.city_at((start + len) % n);
                let first = tour.city_at(start);
                let last = tour.city_at(start + len - 1);
                let q = tour.city_at(dest);
                let r = tour.city_at((dest + 1) % n);
                let (head, tail) = if reversed { (last, first) } else { (first, last) };
                vec![edge(p, a), edge(q, head), edge(tail, r)]
            }
        }
    }
}

/// Normalizes an undirected edge to `(low, high)`.
fn edge(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A scored candidate move: the transformation plus its signed cost delta.
///
/// The delta is computed incrementally from the changed edges only, never by
/// re-summing the tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// The transformation to apply.
    pub kind: MoveKind,
    /// Change in total tour cost if this move were applied.
    pub delta: f64,
}

/// Which neighborhood structures a search sweep enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Neighborhood {
    /// 2-opt edge exchanges only.
    #[default]
    TwoOpt,
    /// Or-opt segment relocations only.
    OrOpt,
    /// 2-opt moves first, then Or-opt moves, in one stream.
    Both,
}

impl Neighborhood {
    /// Returns the move stream for the current tour.
    ///
    /// With candidate lists, 2-opt enumeration is restricted to each city's
    /// k nearest neighbors; Or-opt is unaffected (it is already linear in the
    /// segment cap).
    pub fn moves<'a>(
        &self,
        tour: &'a Tour,
        distances: &'a DistanceMatrix,
        candidates: Option<&'a CandidateLists>,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        let two_opt_stream = move || -> Box<dyn Iterator<Item = Move> + 'a> {
            match candidates {
                Some(cand) => Box::new(two_opt::candidate_moves(tour, distances, cand)),
                None => Box::new(two_opt::moves(tour, distances)),
            }
        };
        match self {
            Neighborhood::TwoOpt => two_opt_stream(),
            Neighborhood::OrOpt => Box::new(or_opt::moves(tour, distances)),
            Neighborhood::Both => Box::new(two_opt_stream().chain(or_opt::moves(tour, distances))),
        }
    }
}

/// Commits a move to the tour.
///
/// The delta carried by the move is *not* re-checked here; the caller adds it
/// to its running cost. Permutation validity is preserved by the tour
/// primitives.
pub fn apply_move(tour: &mut Tour, mv: &Move) {
    match mv.kind {
        MoveKind::TwoOpt { i, j } => tour.reverse_segment(i + 1, j),
        MoveKind::OrOpt {
            start,
            len,
            dest,
            reversed,
        } => tour.relocate_segment(start, len, dest, reversed),
    }
}
