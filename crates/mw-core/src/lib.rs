//! Mess waste tracker core library.
//!
//! - Metrics engine, chart data builder and prediction engine (pure
//!   functions over observation snapshots)
//! - [`service::MessService`], the operations every front end calls
//! - Boundary validation, CSV import/export and a synthetic data generator
//! - The `mw-core` CLI and, behind the `serve` feature, the HTTP dashboard

pub mod charts;
pub mod cli;
pub mod csv_io;
pub mod exit_codes;
pub mod logging;
pub mod metrics;
pub mod predict;
pub mod seed;
#[cfg(feature = "serve")]
pub mod server;
pub mod service;
pub mod validate;

pub use charts::build_chart_series;
pub use exit_codes::ExitCode;
pub use metrics::{derive_rows, summarize};
pub use predict::{fit_and_predict, today_weekday_index, ConsumptionModel};
pub use service::MessService;
pub use validate::ObservationInput;
