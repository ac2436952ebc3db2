//! Acceptance strategies.
//!
//! Every strategy consumes the same scored move stream and returns at most
//! one move to commit. The simulated-annealing variant carries its own
//! temperature state and advances it once per call; the tabu variant carries
//! a short-term memory of recently removed edges; the descent variants are
//! stateless.
//!
//! # Reference
//!
//! Metropolis criterion: Kirkpatrick et al. (1983), Cerny (1985).
//! Tabu search: Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on
//! Computing* 1(3), 190-206.

use crate::local_search::{Move, EPS};
use crate::models::Tour;
use crate::search::config::SearchConfig;
use crate::search::AcceptanceKind;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Outcome of one acceptance pass over the neighborhood.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    /// The move to commit, if any.
    pub chosen: Option<Move>,
    /// Number of candidate moves evaluated before returning.
    pub scanned: usize,
}

/// A polymorphic acceptance strategy with explicit internal state.
#[derive(Debug, Clone)]
pub enum Acceptance {
    /// Steepest descent over the full neighborhood.
    BestImprovement,
    /// First improving move in generator order.
    FirstImprovement,
    /// Metropolis acceptance with geometric cooling.
    Annealing {
        /// Current temperature; decays by `cooling_rate` each call.
        temperature: f64,
        /// Geometric cooling factor in (0, 1).
        cooling_rate: f64,
    },
    /// Best admissible move per sweep, worsening or not, with a bounded FIFO
    /// memory of recently removed edges. A move re-adding a remembered edge
    /// is tabu unless it would beat the incumbent (aspiration).
    Tabu {
        /// FIFO of remembered edges, oldest first.
        queue: VecDeque<(usize, usize)>,
        /// The same edges, for O(1) lookup.
        set: HashSet<(usize, usize)>,
        /// Maximum number of edges remembered.
        tenure: usize,
    },
}

impl Acceptance {
    /// Builds the strategy named by the configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        match config.acceptance {
            AcceptanceKind::Best => Acceptance::BestImprovement,
            AcceptanceKind::First => Acceptance::FirstImprovement,
            AcceptanceKind::Annealing => Acceptance::Annealing {
                temperature: config.initial_temperature,
                cooling_rate: config.cooling_rate,
            },
            AcceptanceKind::Tabu => Acceptance::Tabu {
                queue: VecDeque::new(),
                set: HashSet::new(),
                tenure: config.tabu_tenure,
            },
        }
    }

    /// Returns `true` if an empty selection means a local optimum (the
    /// descent strategies). Annealing and tabu accept worsening moves, so an
    /// empty selection from them never signals a local optimum.
    pub fn terminates_at_local_optimum(&self) -> bool {
        matches!(
            self,
            Acceptance::BestImprovement | Acceptance::FirstImprovement
        )
    }

    /// Current temperature, for annealing only.
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Acceptance::Annealing { temperature, .. } => Some(*temperature),
            _ => None,
        }
    }

    /// Records a committed move. Must be called with the tour as it was
    /// *before* the move was applied; only the tabu strategy keeps state.
    pub fn remember(&mut self, mv: &Move, tour: &Tour) {
        if let Acceptance::Tabu { queue, set, tenure } = self {
            for edge in mv.kind.removed_edges(tour) {
                while queue.len() >= *tenure {
                    if let Some(old) = queue.pop_front() {
                        set.remove(&old);
                    }
                }
                queue.push_back(edge);
                set.insert(edge);
            }
        }
    }

    /// Picks at most one move from the stream.
    ///
    /// - Best-improvement scans everything and keeps the most negative
    ///   delta (first wins on ties, for determinism).
    /// - First-improvement stops at the first negative delta, leaving the
    ///   rest of the stream unenumerated.
    /// - Annealing walks the stream applying the Metropolis test per move
    ///   and commits the first acceptance; it cools once per call whether or
    ///   not anything was accepted.
    /// - Tabu scans everything and keeps the best non-tabu move, worsening
    ///   or not. A tabu move is admissible when `current_cost + delta` beats
    ///   `best_cost`; when every move is tabu the least bad one is taken.
    ///
    /// `tour`, `current_cost`, and `best_cost` describe the state the moves
    /// were generated against; only the tabu strategy consults them.
    pub fn choose<I, R>(
        &mut self,
        moves: I,
        tour: &Tour,
        current_cost: f64,
        best_cost: f64,
        rng: &mut R,
    ) -> Selection
    where
        I: Iterator<Item = Move>,
        R: Rng,
    {
        match self {
            Acceptance::BestImprovement => {
                let mut scanned = 0;
                let mut best: Option<Move> = None;
                for mv in moves {
                    scanned += 1;
                    let better = match best {
                        Some(b) => mv.delta < b.delta,
                        None => mv.delta < -EPS,
                    };
                    if better {
                        best = Some(mv);
                    }
                }
                Selection {
                    chosen: best,
                    scanned,
                }
            }

            Acceptance::FirstImprovement => {
                let mut scanned = 0;
                let mut chosen = None;
                for mv in moves {
                    scanned += 1;
                    if mv.delta < -EPS {
                        chosen = Some(mv);
                        break;
                    }
                }
                Selection { chosen, scanned }
            }

            Acceptance::Annealing {
                temperature,
                cooling_rate,
            } => {
                let mut scanned = 0;
                let mut chosen = None;
                for mv in moves {
                    scanned += 1;
                    let accept = if mv.delta < -EPS {
                        true
                    } else if *temperature > 0.0 {
                        rng.random::<f64>() < (-mv.delta / *temperature).exp()
                    } else {
                        false
                    };
                    if accept {
                        chosen = Some(mv);
                        break;
                    }
                }
                *temperature *= *cooling_rate;
                Selection { chosen, scanned }
            }

            Acceptance::Tabu { set, .. } => {
                let mut scanned = 0;
                let mut best: Option<Move> = None;
                // Least bad move overall, in case everything is tabu.
                let mut fallback: Option<Move> = None;
                for mv in moves {
                    scanned += 1;
                    if fallback.is_none_or(|f| mv.delta < f.delta) {
                        fallback = Some(mv);
                    }
                    let tabu = mv.kind.added_edges(tour).iter().any(|e| set.contains(e));
                    let aspirates = current_cost + mv.delta < best_cost - EPS;
                    if tabu && !aspirates {
                        continue;
                    }
                    if best.is_none_or(|b| mv.delta < b.delta) {
                        best = Some(mv);
                    }
                }
                Selection {
                    chosen: best.or(fallback),
                    scanned,
                }
            }
        }
    }
}
