//! Or-opt segment relocation.
//!
//! # Algorithm
//!
//! Relocates a contiguous segment of 1–3 cities to a different tour
//! position, optionally reversed. Three edges change: the two boundary edges
//! around the segment's old position and the edge split at the insertion
//! point. With `p`/`a` the cities before/after the segment, `f`/`l` its
//! first/last city, and `(q, r)` the split edge:
//!
//! ```text
//! delta = d(p, a) + d(q, f') + d(l', r) - d(p, f) - d(l, a) - d(q, r)
//! ```
//!
//! where `f'`/`l'` swap roles when the segment is reinserted reversed.
//!
//! # Complexity
//!
//! O(n² · L) moves per sweep for segment cap L = 3.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{Move, MoveKind};
use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Longest segment an Or-opt move relocates.
pub const MAX_SEGMENT: usize = 3;

/// Incremental cost change of relocating the segment at `start..start + len`
/// to follow the city at position `dest`, optionally reversed.
///
/// `dest` must lie outside the segment and differ from the position
/// immediately preceding it.
pub fn delta(
    tour: &Tour,
    distances: &DistanceMatrix,
    start: usize,
    len: usize,
    dest: usize,
    reversed: bool,
) -> f64 {
    let n = tour.len();
    let p = tour.city_at((start + n - 1) % n);
    let a = tour.city_at((start + len) % n);
    let first = tour.city_at(start);
    let last = tour.city_at(start + len - 1);
    let q = tour.city_at(dest);
    let r = tour.city_at((dest + 1) % n);
    let (head, tail) = if reversed { (last, first) } else { (first, last) };

    let removed = distances.get(p, first) + distances.get(last, a) + distances.get(q, r);
    let added = distances.get(p, a) + distances.get(q, head) + distances.get(tail, r);
    added - removed
}

/// Enumerates every Or-opt move on the tour, scored.
///
/// Order is `(len, start, dest, reversed)` lexicographic. Destinations
/// inside the segment and the position directly before it are skipped (the
/// latter is the identity relocation); reversed reinsertion is only emitted
/// for segments of length ≥ 2. Segments wrapping the array boundary are not
/// enumerated: relocations of the pairs and triples spanning the wrap point
/// are deliberately left out of the neighborhood, which keeps enumeration
/// aligned with the contiguous ranges `relocate_segment` operates on.
pub fn moves<'a>(
    tour: &'a Tour,
    distances: &'a DistanceMatrix,
) -> impl Iterator<Item = Move> + 'a {
    let n = tour.len();
    let max_len = MAX_SEGMENT.min(n.saturating_sub(2));
    (1..=max_len).flat_map(move |len| {
        (0..=(n - len)).flat_map(move |start| {
            let pred = (start + n - 1) % n;
            (0..n)
                .filter(move |&dest| {
                    dest != pred && !(dest >= start && dest < start + len)
                })
                .flat_map(move |dest| {
                    let variants: &[bool] = if len == 1 { &[false] } else { &[false, true] };
                    variants.iter().map(move |&reversed| Move {
                        kind: MoveKind::OrOpt {
                            start,
                            len,
                            dest,
                            reversed,
                        },
                        delta: delta(tour, distances, start, len, dest, reversed),
                    })
                })
        })
    })
}
