//! The search engine: configuration, acceptance strategies, and the driver
//! loop tying neighborhoods, move evaluation, and incumbent tracking
//! together.

mod acceptance;
mod config;
mod driver;

pub use acceptance::{Acceptance, Selection};
pub use config::{AcceptanceKind, InitialTour, RestartPolicy, SearchConfig};
pub use driver::{optimize, optimize_matrix, RunStats, SearchResult, Termination};
