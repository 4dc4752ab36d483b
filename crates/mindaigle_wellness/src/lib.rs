//! Mindaigle wellness core.
//!
//! Validates daily health submissions, merges them into the per-day record,
//! scores the result and keeps a dated score history in a [`HealthStore`].
//!
//! [`HealthStore`]: mindaigle_store_client::HealthStore

pub mod config;
pub mod domains;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;

pub use config::ServerConfig;
pub use error::{WellnessError, WellnessResult};
pub use middleware::InstrumentedStore;
pub use routes::{RouterLimits, router};
pub use services::WellnessService;
pub use state::AppState;
