//! Tour representation.
//!
//! A [`Tour`] is a cyclic permutation of all cities stored as an array plus
//! an inverse position index, giving O(1) successor/predecessor queries and
//! O(segment) reversal. For the instance sizes this engine targets (up to a
//! few thousand cities) the array representation outperforms a doubly linked
//! list and keeps the move primitives simple.

use crate::distance::DistanceMatrix;
use crate::error::ConfigError;
use rand::seq::SliceRandom;
use rand::Rng;

/// A Hamiltonian cycle over cities `0..n`, each visited exactly once.
///
/// The permutation invariant holds across every mutation: `reverse_segment`,
/// `relocate_segment`, and `shuffle_segment` all rearrange existing entries
/// and repair the inverse index, so no city is ever duplicated or dropped.
///
/// # Examples
///
/// ```
/// use tsp_ls::models::Tour;
///
/// let tour = Tour::new(vec![0, 2, 1, 3]).unwrap();
/// assert_eq!(tour.len(), 4);
/// assert_eq!(tour.successor(2), 1);
/// assert_eq!(tour.predecessor(2), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Tour {
    /// `order[pos]` = city at tour position `pos`.
    order: Vec<usize>,
    /// `position[city]` = tour position of `city`. Inverse of `order`.
    position: Vec<usize>,
}

impl Tour {
    /// Creates a tour from an ordered city sequence.
    ///
    /// The sequence must be a permutation of `0..n`; otherwise the offending
    /// duplicate or out-of-range id is reported.
    pub fn new(order: Vec<usize>) -> Result<Self, ConfigError> {
        let n = order.len();
        if n == 0 {
            return Err(ConfigError::EmptyInstance);
        }
        let mut position = vec![usize::MAX; n];
        for (pos, &city) in order.iter().enumerate() {
            if city >= n {
                return Err(ConfigError::CityIdOutOfRange { id: city, n });
            }
            if position[city] != usize::MAX {
                return Err(ConfigError::DuplicateCity(city));
            }
            position[city] = pos;
        }
        Ok(Self { order, position })
    }

    /// Number of cities in the tour.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`: an empty sequence is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// City at the given tour position.
    pub fn city_at(&self, pos: usize) -> usize {
        self.order[pos]
    }

    /// Tour position of the given city.
    pub fn position_of(&self, city: usize) -> usize {
        self.position[city]
    }

    /// The city visited immediately after `city`.
    pub fn successor(&self, city: usize) -> usize {
        let pos = self.position[city];
        self.order[(pos + 1) % self.order.len()]
    }

    /// The city visited immediately before `city`.
    pub fn predecessor(&self, city: usize) -> usize {
        let pos = self.position[city];
        let n = self.order.len();
        self.order[(pos + n - 1) % n]
    }

    /// The tour as an ordered city sequence.
    pub fn cities(&self) -> &[usize] {
        &self.order
    }

    /// Consumes the tour, returning the ordered city sequence.
    pub fn into_cities(self) -> Vec<usize> {
        self.order
    }

    /// Total cycle cost under the given distance matrix.
    ///
    /// Full O(n) recomputation. The search driver tracks cost incrementally
    /// and only calls this for initialization and periodic resynchronization.
    pub fn cost(&self, distances: &DistanceMatrix) -> f64 {
        let n = self.order.len();
        let mut total = 0.0;
        for pos in 0..n {
            total += distances.get(self.order[pos], self.order[(pos + 1) % n]);
        }
        total
    }

    /// Reverses the segment of tour positions `i..=j` in place.
    ///
    /// This is the 2-opt application primitive: reversing positions
    /// `i+1..=j` replaces edges `(order[i], order[i+1])` and
    /// `(order[j], order[j+1])` with `(order[i], order[j])` and
    /// `(order[i+1], order[j+1])`. O(j − i).
    ///
    /// # Panics
    ///
    /// Panics if `i > j` or `j` is out of bounds.
    pub fn reverse_segment(&mut self, i: usize, j: usize) {
        self.order[i..=j].reverse();
        for pos in i..=j {
            self.position[self.order[pos]] = pos;
        }
    }

    /// Relocates the segment at positions `start..start + len` so it follows
    /// the city currently at position `dest`, optionally reversed.
    ///
    /// This is the Or-opt application primitive. `dest` must lie outside the
    /// segment and must not be the position immediately preceding it.
    ///
    /// # Panics
    ///
    /// Panics if the segment or `dest` is out of bounds, or if `dest` falls
    /// inside the segment.
    pub fn relocate_segment(&mut self, start: usize, len: usize, dest: usize, reversed: bool) {
        assert!(
            dest < start || dest >= start + len,
            "relocation destination inside segment"
        );
        let mut segment: Vec<usize> = self.order.drain(start..start + len).collect();
        if reversed {
            segment.reverse();
        }
        // After draining, positions past the segment shift left by `len`.
        let insert_at = if dest < start { dest + 1 } else { dest + 1 - len };
        for (offset, &city) in segment.iter().enumerate() {
            self.order.insert(insert_at + offset, city);
        }
        self.rebuild_positions();
    }

    /// Shuffles the segment of tour positions `start..start + len` in place.
    ///
    /// Used as a diversification step after reaching a local optimum. The
    /// permutation invariant is preserved (entries are only rearranged).
    pub fn shuffle_segment<R: Rng>(&mut self, start: usize, len: usize, rng: &mut R) {
        self.order[start..start + len].shuffle(rng);
        for pos in start..start + len {
            self.position[self.order[pos]] = pos;
        }
    }

    fn rebuild_positions(&mut self) {
        for (pos, &city) in self.order.iter().enumerate() {
            self.position[city] = pos;
        }
    }

    /// Returns `true` if the internal order is a valid permutation of `0..n`
    /// and the position index is consistent with it.
    pub fn is_valid_permutation(&self) -> bool {
        let n = self.order.len();
        let mut seen = vec![false; n];
        for (pos, &city) in self.order.iter().enumerate() {
            if city >= n || seen[city] || self.position[city] != pos {
                return false;
            }
            seen[city] = true;
        }
        true
    }
}
