//! HTML rendering for the mess waste tracker.
//!
//! Pages are askama templates over display-ready view models. The same
//! templates back the HTTP front end and the static report written by
//! `mw-core report`.

pub mod error;
pub mod flash;
pub mod pages;
pub mod report;
pub mod view;

pub use error::{ReportError, Result};
pub use flash::{Flash, FlashLevel};
pub use pages::{
    AddPage, AnalyticsPage, DashboardPage, EditPage, ErrorPage, PredictionPage, RecordsPage,
    ReportPage,
};
pub use report::{render_html, write_report};
pub use view::{row_views, RecordForm};

/// Re-exported so callers can render pages without naming askama.
pub use askama::Template;
