//! Mess waste tracker common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the mw-* crates:
//! - Daily observations and their derived (never stored) columns
//! - Record and run identifiers
//! - The unified error type and its stable codes
//! - Analytics result types shared by the engines and the renderers
//! - Output format selection and schema versioning

pub mod analytics;
pub mod error;
pub mod id;
pub mod observation;
pub mod output;
pub mod schema;

pub use analytics::{
    ChartSeries, ConsumptionSeries, Dashboard, DerivedRow, LabeledSeries, ModelCoefficients,
    PredictionResult, SummaryMetrics,
};
pub use error::{Error, Result};
pub use id::{RecordId, RunId};
pub use observation::{weekday_name, Observation, Record, WEEKDAY_NAMES};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
