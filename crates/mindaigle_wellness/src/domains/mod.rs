//! Domain modules for business logic encapsulation.
//!
//! Everything in here is pure: no store access, no clocks read implicitly.
//! The service layer feeds these functions and persists their output.
//!
//! # Modules
//!
//! - [`validation`]: Range checks on inbound metric submissions
//! - [`scoring`]: Wellness score strategies
//! - [`merge`]: Folding a submission into the stored daily record

pub mod merge;
pub mod scoring;
pub mod validation;

pub use merge::{MergeOutcome, merge_daily_record};
pub use scoring::{MetricGroup, ScoreStrategy, daily_percentage_score, wellness_score};
pub use validation::{ValidationError, validate_sample};
