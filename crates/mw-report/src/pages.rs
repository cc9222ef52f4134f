//! Page templates.

use askama::Template;
use mw_common::{ChartSeries, Dashboard, PredictionResult, Record};

use crate::error::Result;
use crate::flash::Flash;
use crate::view::{
    chart_json, row_views, weekday_options, MetricCards, PredictionView, RecordForm, RowView,
    WeekdayOption,
};

/// Add-record form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct AddPage {
    pub flash: Option<Flash>,
    pub form: RecordForm,
}

impl AddPage {
    pub fn new(form: RecordForm, flash: Option<Flash>) -> Self {
        Self { flash, form }
    }
}

/// Metrics and the full record table; `metrics == None` shows the
/// placeholder.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub flash: Option<Flash>,
    pub last_updated: String,
    pub metrics: Option<MetricCards>,
    pub rows: Vec<RowView>,
    pub show_actions: bool,
}

impl DashboardPage {
    pub fn new(dashboard: Option<&Dashboard>, last_updated: String, flash: Option<Flash>) -> Self {
        Self {
            flash,
            last_updated,
            metrics: dashboard.map(|d| MetricCards::from(&d.metrics)),
            rows: dashboard.map(|d| row_views(&d.rows)).unwrap_or_default(),
            show_actions: false,
        }
    }
}

#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsPage {
    pub flash: Option<Flash>,
    pub chart_json: Option<String>,
}

impl AnalyticsPage {
    pub fn new(series: Option<&ChartSeries>, flash: Option<Flash>) -> Result<Self> {
        Ok(Self {
            flash,
            chart_json: series.map(chart_json).transpose()?,
        })
    }
}

#[derive(Template)]
#[template(path = "records.html")]
pub struct RecordsPage {
    pub flash: Option<Flash>,
    pub rows: Vec<RowView>,
    pub show_actions: bool,
}

impl RecordsPage {
    pub fn new(rows: Vec<RowView>, flash: Option<Flash>) -> Self {
        Self {
            flash,
            rows,
            show_actions: true,
        }
    }
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub flash: Option<Flash>,
    pub id: i64,
    pub form: RecordForm,
}

impl EditPage {
    pub fn new(id: i64, form: RecordForm, flash: Option<Flash>) -> Self {
        Self { flash, id, form }
    }

    pub fn for_record(record: &Record) -> Self {
        Self::new(record.id.0, RecordForm::from_record(record), None)
    }
}

#[derive(Template)]
#[template(path = "prediction.html")]
pub struct PredictionPage {
    pub flash: Option<Flash>,
    pub attendees: String,
    pub weekdays: Vec<WeekdayOption>,
    pub result: Option<PredictionView>,
}

impl PredictionPage {
    /// Empty form.
    pub fn blank() -> Self {
        Self {
            flash: None,
            attendees: String::new(),
            weekdays: weekday_options(None),
            result: None,
        }
    }

    /// Form echoing the submitted values, with an optional result.
    pub fn submitted(
        attendees: impl Into<String>,
        weekday: Option<u8>,
        result: Option<&PredictionResult>,
        flash: Option<Flash>,
    ) -> Self {
        Self {
            flash,
            attendees: attendees.into(),
            weekdays: weekday_options(weekday),
            result: result.map(PredictionView::from),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub flash: Option<Flash>,
    pub heading: String,
    pub message: String,
}

impl ErrorPage {
    pub fn new(heading: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            flash: None,
            heading: heading.into(),
            message: message.into(),
        }
    }
}

/// Self-contained dashboard and charts for offline viewing.
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage {
    pub flash: Option<Flash>,
    pub generated_at: String,
    pub metrics: MetricCards,
    pub chart_json: String,
    pub rows: Vec<RowView>,
    pub show_actions: bool,
}

impl ReportPage {
    pub fn new(dashboard: &Dashboard, series: &ChartSeries, generated_at: String) -> Result<Self> {
        Ok(Self {
            flash: None,
            generated_at,
            metrics: MetricCards::from(&dashboard.metrics),
            chart_json: chart_json(series)?,
            rows: row_views(&dashboard.rows),
            show_actions: false,
        })
    }
}
