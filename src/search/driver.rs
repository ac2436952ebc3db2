//! Search driver.
//!
//! # State machine
//!
//! ```text
//! Running ──(no accepted move, descent)──► LocalOptimum ──► Terminated
//!    │  ▲                                             │
//!    │  └──────────(restart budget left)──────────────┘
//!    └──(iteration/time budget hit)──► BudgetExhausted ──► Terminated
//! ```
//!
//! Each iteration the driver checks its budgets, pulls the neighborhood
//! stream, lets the acceptance strategy pick at most one move, commits it,
//! and adds the move's delta to the running cost. The incumbent (best-found
//! tour and cost) is tracked separately from the current state, so
//! non-improving exploration and restarts never lose it. The driver owns the
//! tour exclusively; nothing else mutates it.

use crate::constructive::{nearest_neighbor_tour, random_tour};
use crate::distance::{CandidateLists, DistanceMatrix};
use crate::error::ConfigError;
use crate::local_search::{apply_move, EPS};
use crate::models::{City, Tour};
use crate::search::acceptance::Acceptance;
use crate::search::config::{InitialTour, RestartPolicy, SearchConfig};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Tolerance for symmetry validation and drift reconciliation.
const DRIFT_TOL: f64 = 1e-6;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No move in the neighborhood improves the current tour and the restart
    /// budget is spent. Only reachable by the descent strategies.
    LocalOptimum,
    /// The iteration or wall-clock budget ran out. A normal exit, not an
    /// error; the incumbent is still returned.
    BudgetExhausted,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Iterations executed (one acceptance pass each).
    pub iterations: usize,
    /// Moves committed to the tour.
    pub accepted: usize,
    /// Candidate moves evaluated but not committed.
    pub rejected: usize,
    /// Diversification rounds taken after local optima.
    pub restarts: usize,
    /// Full-cost recomputations performed for drift control.
    pub resyncs: usize,
    /// Incumbent cost after each improvement, starting with the initial
    /// tour's cost. Non-increasing by construction.
    pub cost_history: Vec<f64>,
}

/// Best-found tour plus run accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best-found tour as an ordered city sequence.
    pub tour: Vec<usize>,
    /// Cost of the best-found tour.
    pub cost: f64,
    /// Why the run stopped.
    pub termination: Termination,
    /// Run statistics.
    pub stats: RunStats,
}

/// Optimizes a tour over the given cities.
///
/// Builds a Euclidean distance matrix from the coordinates, validates the
/// instance and configuration, and runs the search loop. This is the main
/// entry point.
///
/// # Errors
///
/// Returns a [`ConfigError`] for malformed input: duplicate or out-of-range
/// city ids, non-finite coordinates, or invalid option values. Nothing fails
/// once the loop is running.
///
/// # Examples
///
/// ```
/// use tsp_ls::models::City;
/// use tsp_ls::search::{optimize, SearchConfig};
///
/// // Four corners of a unit square.
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 1.0, 0.0),
///     City::new(2, 1.0, 1.0),
///     City::new(3, 0.0, 1.0),
/// ];
/// let result = optimize(&cities, &SearchConfig::default().with_seed(42)).unwrap();
/// assert!((result.cost - 4.0).abs() < 1e-10);
/// ```
pub fn optimize(cities: &[City], config: &SearchConfig) -> Result<SearchResult, ConfigError> {
    let n = cities.len();
    if n == 0 {
        return Err(ConfigError::EmptyInstance);
    }
    let mut seen = vec![false; n];
    for city in cities {
        if !city.x().is_finite() || !city.y().is_finite() {
            return Err(ConfigError::NonFiniteCoordinate(city.id()));
        }
        if city.id() >= n {
            return Err(ConfigError::CityIdOutOfRange { id: city.id(), n });
        }
        if seen[city.id()] {
            return Err(ConfigError::DuplicateCity(city.id()));
        }
        seen[city.id()] = true;
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(ConfigError::MissingCity(missing));
    }

    let distances = DistanceMatrix::from_cities(cities);
    optimize_matrix(&distances, config)
}

/// Optimizes a tour over an explicit symmetric distance matrix.
///
/// For instances given as arbitrary symmetric matrices rather than
/// coordinates. The matrix is validated for finiteness, non-negativity, and
/// symmetry before the loop starts; no triangle inequality is assumed.
pub fn optimize_matrix(
    distances: &DistanceMatrix,
    config: &SearchConfig,
) -> Result<SearchResult, ConfigError> {
    config.validate()?;
    distances.validate(DRIFT_TOL)?;

    let n = distances.size();
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

    let initial_order = match &config.initial {
        InitialTour::Random => random_tour(n, &mut rng),
        InitialTour::NearestNeighbor => nearest_neighbor_tour(distances),
        InitialTour::Given(order) => {
            if order.len() != n {
                return Err(ConfigError::InvalidOption(format!(
                    "initial tour has {} cities, instance has {n}",
                    order.len()
                )));
            }
            order.clone()
        }
    };
    let tour = Tour::new(initial_order)?;

    let candidates = config
        .candidate_list_size
        .map(|k| CandidateLists::build(distances, k));

    Ok(run_loop(tour, distances, candidates.as_ref(), config, rng))
}

/// The `Running` state: iterate until a terminal transition fires.
fn run_loop(
    mut tour: Tour,
    distances: &DistanceMatrix,
    candidates: Option<&CandidateLists>,
    config: &SearchConfig,
    mut rng: StdRng,
) -> SearchResult {
    let started = Instant::now();
    let mut acceptance = Acceptance::from_config(config);

    let mut current_cost = tour.cost(distances);
    let mut best_tour = tour.clone();
    let mut best_cost = current_cost;

    let mut stats = RunStats {
        cost_history: vec![best_cost],
        ..RunStats::default()
    };
    let mut restarts_left = match config.restart {
        RestartPolicy::None => 0,
        RestartPolicy::Shuffle { max_restarts } => max_restarts,
    };

    let termination = loop {
        // Budget checks fire at the top of the iteration, so a committed
        // move is never half-applied on exit.
        if config.max_iterations > 0 && stats.iterations >= config.max_iterations {
            break Termination::BudgetExhausted;
        }
        if let Some(limit) = config.time_limit {
            if started.elapsed() >= limit {
                break Termination::BudgetExhausted;
            }
        }

        let moves = config.neighborhood.moves(&tour, distances, candidates);
        let selection = acceptance.choose(moves, &tour, current_cost, best_cost, &mut rng);
        stats.iterations += 1;

        match selection.chosen {
            Some(mv) => {
                stats.rejected += selection.scanned - 1;
                acceptance.remember(&mv, &tour);
                apply_move(&mut tour, &mv);
                current_cost += mv.delta;
                stats.accepted += 1;
                debug!(
                    "iteration {}: accepted {:?} (delta {:.6}, cost {:.6})",
                    stats.iterations, mv.kind, mv.delta, current_cost
                );

                if config.resync_interval > 0
                    && stats.accepted.is_multiple_of(config.resync_interval)
                {
                    current_cost = resync_cost(&tour, distances, current_cost, &mut stats);
                }

                if current_cost < best_cost - EPS {
                    best_cost = current_cost;
                    best_tour = tour.clone();
                    stats.cost_history.push(best_cost);
                }
            }
            None => {
                stats.rejected += selection.scanned;
                if !acceptance.terminates_at_local_optimum() {
                    // A cold annealing sweep, or a tabu sweep over an empty
                    // neighborhood; only budgets stop these strategies.
                    continue;
                }
                if restarts_left == 0 {
                    break Termination::LocalOptimum;
                }
                restarts_left -= 1;
                stats.restarts += 1;
                shuffle_diversify(&mut tour, &mut rng);
                current_cost = tour.cost(distances);
                info!(
                    "local optimum at cost {best_cost:.6}; restart {} (perturbed cost {current_cost:.6})",
                    stats.restarts
                );
            }
        }
    };

    info!(
        "terminated ({termination:?}) after {} iterations: best cost {best_cost:.6}, \
         {} accepted / {} rejected",
        stats.iterations, stats.accepted, stats.rejected
    );

    SearchResult {
        tour: best_tour.into_cities(),
        cost: best_cost,
        termination,
        stats,
    }
}

/// Recomputes the true cost and reconciles accumulated float drift.
fn resync_cost(
    tour: &Tour,
    distances: &DistanceMatrix,
    current_cost: f64,
    stats: &mut RunStats,
) -> f64 {
    let true_cost = tour.cost(distances);
    stats.resyncs += 1;
    if (true_cost - current_cost).abs() > DRIFT_TOL {
        warn!(
            "incremental cost {current_cost:.9} drifted from true cost {true_cost:.9}; reconciling"
        );
    }
    true_cost
}

/// Diversification: shuffle a random tour segment of about a quarter of the
/// instance (at least 4 cities), leaving the rest of the tour intact.
fn shuffle_diversify(tour: &mut Tour, rng: &mut StdRng) {
    let n = tour.len();
    let len = (n / 4).max(4).min(n);
    let start = if len == n {
        0
    } else {
        rng.random_range(0..=(n - len))
    };
    tour.shuffle_segment(start, len, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::{two_opt, Neighborhood};
    use crate::search::config::AcceptanceKind;
    use std::time::Duration;

    /// Convex pentagon on the unit circle; the perimeter is the optimum and
    /// 2-opt descent reaches it from any start.
    fn pentagon() -> Vec<City> {
        (0..5)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / 5.0;
                City::new(i, angle.cos(), angle.sin())
            })
            .collect()
    }

    fn pentagon_perimeter() -> f64 {
        let cities = pentagon();
        5.0 * cities[0].distance_to(&cities[1])
    }

    #[test]
    fn test_pentagon_reaches_perimeter_from_any_seed() {
        let cities = pentagon();
        for seed in 0..10 {
            let config = SearchConfig::default().with_seed(seed);
            let result = optimize(&cities, &config).expect("valid instance");
            assert_eq!(result.termination, Termination::LocalOptimum);
            assert!(
                (result.cost - pentagon_perimeter()).abs() < 1e-9,
                "seed {seed}: got {}, expected perimeter {}",
                result.cost,
                pentagon_perimeter()
            );
        }
    }

    #[test]
    fn test_crossing_square_fixed_by_single_move() {
        let cities = vec![
            City::new(0, 0.0, 0.0),
            City::new(1, 1.0, 0.0),
            City::new(2, 1.0, 1.0),
            City::new(3, 0.0, 1.0),
        ];
        // 0→2→1→3 crosses; exactly one 2-opt move uncrosses it.
        let config = SearchConfig::default()
            .with_initial(InitialTour::Given(vec![0, 2, 1, 3]))
            .with_seed(0);
        let result = optimize(&cities, &config).expect("valid instance");
        assert_eq!(result.termination, Termination::LocalOptimum);
        assert_eq!(result.stats.accepted, 1);
        assert!((result.cost - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_local_optimum_is_two_opt_free() {
        let cities: Vec<City> = (0..12)
            .map(|i| {
                let x = (i * 37 % 100) as f64;
                let y = (i * 61 % 100) as f64;
                City::new(i, x, y)
            })
            .collect();
        for kind in [AcceptanceKind::Best, AcceptanceKind::First] {
            let config = SearchConfig::default().with_acceptance(kind).with_seed(5);
            let result = optimize(&cities, &config).expect("valid instance");
            assert_eq!(result.termination, Termination::LocalOptimum);

            // No single 2-opt move on the returned tour improves it.
            let dm = DistanceMatrix::from_cities(&cities);
            let tour = Tour::new(result.tour.clone()).expect("result is a permutation");
            let improving = two_opt::moves(&tour, &dm).filter(|m| m.delta < -EPS).count();
            assert_eq!(improving, 0, "{kind:?} stopped before a true local optimum");
        }
    }

    #[test]
    fn test_city_slice_order_does_not_change_result() {
        // Valid instances may list cities in any order; the result must be
        // keyed by id, not slice position.
        let cities = pentagon();
        let shuffled: Vec<City> = [2, 0, 3, 1, 4].iter().map(|&i| cities[i].clone()).collect();
        let config = SearchConfig::default().with_seed(5);
        let result = optimize(&shuffled, &config).expect("valid instance");

        // Walking the returned id sequence through the coordinates must
        // reproduce the reported cost.
        let n = result.tour.len();
        let walked: f64 = (0..n)
            .map(|p| cities[result.tour[p]].distance_to(&cities[result.tour[(p + 1) % n]]))
            .sum();
        assert!((walked - result.cost).abs() < 1e-9);
        assert!((result.cost - pentagon_perimeter()).abs() < 1e-9);
    }

    #[test]
    fn test_tabu_escapes_local_optimum() {
        let cities: Vec<City> = (0..12)
            .map(|i| City::new(i, (i * 37 % 100) as f64, (i * 61 % 100) as f64))
            .collect();
        let descent = SearchConfig::default().with_seed(5);
        let tabu = descent
            .clone()
            .with_acceptance(AcceptanceKind::Tabu)
            .with_max_iterations(300);

        let base = optimize(&cities, &descent).expect("valid instance");
        let explored = optimize(&cities, &tabu).expect("valid instance");

        assert_eq!(explored.termination, Termination::BudgetExhausted);
        // Improving moves always pass aspiration while descending, so tabu
        // reaches the same first local optimum and then keeps moving.
        assert!(explored.cost <= base.cost + EPS);
        assert!(explored.stats.accepted > base.stats.accepted);
        let mut sorted = explored.tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_tabu_deterministic_without_seeded_randomness() {
        // Tabu selection never draws from the RNG; only the initial tour
        // does, so a fixed seed fixes the whole run.
        let cities: Vec<City> = (0..10)
            .map(|i| City::new(i, (i * 17 % 50) as f64, (i * 31 % 50) as f64))
            .collect();
        let config = SearchConfig::default()
            .with_acceptance(AcceptanceKind::Tabu)
            .with_max_iterations(200)
            .with_seed(21);
        let a = optimize(&cities, &config).expect("valid instance");
        let b = optimize(&cities, &config).expect("valid instance");
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost, b.cost);
        assert_eq!(a.stats.cost_history, b.stats.cost_history);
    }

    #[test]
    fn test_determinism_same_seed_same_result() {
        let cities = pentagon();
        let config = SearchConfig::default()
            .with_neighborhood(Neighborhood::Both)
            .with_acceptance(AcceptanceKind::Annealing)
            .with_max_iterations(2000)
            .with_initial_temperature(5.0)
            .with_cooling_rate(0.995)
            .with_seed(123);

        let a = optimize(&cities, &config).expect("valid instance");
        let b = optimize(&cities, &config).expect("valid instance");
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost, b.cost);
        assert_eq!(a.stats.accepted, b.stats.accepted);
        assert_eq!(a.stats.cost_history, b.stats.cost_history);
    }

    #[test]
    fn test_monotonic_incumbent_all_strategies() {
        let cities: Vec<City> = (0..15)
            .map(|i| City::new(i, (i * 53 % 97) as f64, (i * 29 % 89) as f64))
            .collect();
        for kind in [
            AcceptanceKind::Best,
            AcceptanceKind::First,
            AcceptanceKind::Annealing,
            AcceptanceKind::Tabu,
        ] {
            let config = SearchConfig::default()
                .with_acceptance(kind)
                .with_max_iterations(500)
                .with_seed(9);
            let result = optimize(&cities, &config).expect("valid instance");
            for window in result.stats.cost_history.windows(2) {
                assert!(
                    window[1] <= window[0] + EPS,
                    "{kind:?}: incumbent increased from {} to {}",
                    window[0],
                    window[1]
                );
            }
        }
    }

    #[test]
    fn test_budget_exhaustion_iterations() {
        let cities = pentagon();
        let config = SearchConfig::default()
            .with_acceptance(AcceptanceKind::Annealing)
            .with_max_iterations(50)
            .with_seed(1);
        let result = optimize(&cities, &config).expect("valid instance");
        assert_eq!(result.termination, Termination::BudgetExhausted);
        assert_eq!(result.stats.iterations, 50);
    }

    #[test]
    fn test_zero_time_limit_returns_initial_incumbent() {
        let cities = pentagon();
        let config = SearchConfig::default()
            .with_time_limit(Duration::ZERO)
            .with_seed(3);
        let result = optimize(&cities, &config).expect("valid instance");
        assert_eq!(result.termination, Termination::BudgetExhausted);
        assert_eq!(result.stats.iterations, 0);
        // Still a valid tour: the seeded initial permutation.
        let mut sorted = result.tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..5).collect::<Vec<_>>());
    }

    #[test]
    fn test_restart_policy_runs_and_keeps_incumbent() {
        let cities: Vec<City> = (0..10)
            .map(|i| City::new(i, (i * 17 % 50) as f64, (i * 31 % 50) as f64))
            .collect();
        let no_restart = SearchConfig::default().with_seed(4);
        let with_restart = no_restart
            .clone()
            .with_restart(RestartPolicy::Shuffle { max_restarts: 5 });

        let base = optimize(&cities, &no_restart).expect("valid instance");
        let diversified = optimize(&cities, &with_restart).expect("valid instance");

        assert_eq!(diversified.stats.restarts, 5);
        assert_eq!(diversified.termination, Termination::LocalOptimum);
        // Restarts can only improve or match the incumbent.
        assert!(diversified.cost <= base.cost + EPS);
    }

    #[test]
    fn test_nearest_neighbor_initial() {
        let cities = pentagon();
        let config = SearchConfig::default().with_initial(InitialTour::NearestNeighbor);
        let result = optimize(&cities, &config).expect("valid instance");
        assert!((result.cost - pentagon_perimeter()).abs() < 1e-9);
    }

    #[test]
    fn test_given_initial_wrong_length_rejected() {
        let cities = pentagon();
        let config = SearchConfig::default().with_initial(InitialTour::Given(vec![0, 1, 2]));
        assert!(matches!(
            optimize(&cities, &config),
            Err(ConfigError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_given_initial_duplicate_rejected() {
        let cities = pentagon();
        let config = SearchConfig::default().with_initial(InitialTour::Given(vec![0, 1, 2, 2, 4]));
        assert_eq!(
            optimize(&cities, &config).unwrap_err(),
            ConfigError::DuplicateCity(2)
        );
    }

    #[test]
    fn test_duplicate_city_id_rejected() {
        let cities = vec![City::new(0, 0.0, 0.0), City::new(0, 1.0, 1.0)];
        assert_eq!(
            optimize(&cities, &SearchConfig::default()).unwrap_err(),
            ConfigError::DuplicateCity(0)
        );
    }

    #[test]
    fn test_out_of_range_city_id_rejected() {
        let cities = vec![City::new(0, 0.0, 0.0), City::new(7, 1.0, 1.0)];
        assert_eq!(
            optimize(&cities, &SearchConfig::default()).unwrap_err(),
            ConfigError::CityIdOutOfRange { id: 7, n: 2 }
        );
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let cities = vec![City::new(0, 0.0, 0.0), City::new(1, f64::NAN, 1.0)];
        assert_eq!(
            optimize(&cities, &SearchConfig::default()).unwrap_err(),
            ConfigError::NonFiniteCoordinate(1)
        );
    }

    #[test]
    fn test_empty_instance_rejected() {
        assert_eq!(
            optimize(&[], &SearchConfig::default()).unwrap_err(),
            ConfigError::EmptyInstance
        );
    }

    #[test]
    fn test_matrix_instance_without_triangle_inequality() {
        // Violates the triangle inequality; the engine must not care.
        let dm = DistanceMatrix::from_data(
            4,
            vec![
                0.0, 1.0, 10.0, 1.0, //
                1.0, 0.0, 1.0, 10.0, //
                10.0, 1.0, 0.0, 1.0, //
                1.0, 10.0, 1.0, 0.0,
            ],
        )
        .expect("valid");
        let config = SearchConfig::default().with_seed(2);
        let result = optimize_matrix(&dm, &config).expect("valid instance");
        assert_eq!(result.termination, Termination::LocalOptimum);
        // Optimal cycle alternates: 0→1→2→3→0 = 4.
        assert!((result.cost - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_asymmetric_matrix_rejected() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 1.0);
        dm.set(1, 0, 2.0);
        assert_eq!(
            optimize_matrix(&dm, &SearchConfig::default()).unwrap_err(),
            ConfigError::AsymmetricDistance { from: 0, to: 1 }
        );
    }

    #[test]
    fn test_tiny_instances_terminate() {
        for n in 1..=3 {
            let cities: Vec<City> = (0..n).map(|i| City::new(i, i as f64, 0.0)).collect();
            let result = optimize(&cities, &SearchConfig::default().with_seed(0))
                .expect("valid instance");
            assert_eq!(result.termination, Termination::LocalOptimum);
            assert_eq!(result.tour.len(), n);
        }
    }

    #[test]
    fn test_candidate_lists_match_full_neighborhood_on_pentagon() {
        let cities = pentagon();
        let full = optimize(&cities, &SearchConfig::default().with_seed(8)).expect("valid");
        let restricted = optimize(
            &cities,
            &SearchConfig::default().with_seed(8).with_candidate_list_size(4),
        )
        .expect("valid");
        assert!((full.cost - restricted.cost).abs() < 1e-9);
    }

    #[test]
    fn test_or_opt_only_neighborhood() {
        let cities: Vec<City> = (0..8)
            .map(|i| City::new(i, (i * 13 % 40) as f64, (i * 7 % 40) as f64))
            .collect();
        let config = SearchConfig::default()
            .with_neighborhood(Neighborhood::OrOpt)
            .with_seed(6);
        let result = optimize(&cities, &config).expect("valid instance");
        assert_eq!(result.termination, Termination::LocalOptimum);
        let mut sorted = result.tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_resync_counted() {
        let cities: Vec<City> = (0..20)
            .map(|i| City::new(i, (i * 37 % 100) as f64, (i * 61 % 100) as f64))
            .collect();
        let config = SearchConfig::default()
            .with_neighborhood(Neighborhood::Both)
            .with_resync_interval(1)
            .with_seed(11);
        let result = optimize(&cities, &config).expect("valid instance");
        assert_eq!(result.stats.resyncs, result.stats.accepted);
    }

    #[test]
    fn test_rejected_counts_scanned_moves() {
        let cities = pentagon();
        let config = SearchConfig::default().with_seed(14);
        let result = optimize(&cities, &config).expect("valid instance");
        // Best-improvement scans the whole neighborhood each iteration; the
        // final sweep rejects everything.
        assert!(result.stats.rejected > 0);
    }
}
