//! # tsp-ls
//!
//! Local search engine for the symmetric Traveling Salesman Problem. No
//! external solver: the crate implements its own neighborhood enumeration,
//! incremental cost bookkeeping, and acceptance policies.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (City, Tour)
//! - [`distance`] — Distance matrix and nearest-neighbor candidate lists
//! - [`constructive`] — Initial tour construction (random, nearest neighbor)
//! - [`local_search`] — Neighborhood generators and move evaluation (2-opt, Or-opt)
//! - [`search`] — Acceptance strategies, configuration, and the driver loop
//! - [`error`] — Input and configuration validation errors
//!
//! ## Example
//!
//! ```
//! use tsp_ls::models::City;
//! use tsp_ls::search::{optimize, AcceptanceKind, SearchConfig};
//! use tsp_ls::local_search::Neighborhood;
//!
//! let cities = vec![
//!     City::new(0, 0.0, 0.0),
//!     City::new(1, 4.0, 0.0),
//!     City::new(2, 4.0, 3.0),
//!     City::new(3, 0.0, 3.0),
//! ];
//! let config = SearchConfig::default()
//!     .with_neighborhood(Neighborhood::Both)
//!     .with_acceptance(AcceptanceKind::Best)
//!     .with_seed(42);
//!
//! let result = optimize(&cities, &config).unwrap();
//! assert_eq!(result.tour.len(), 4);
//! assert!((result.cost - 14.0).abs() < 1e-10);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod local_search;
pub mod models;
pub mod search;
