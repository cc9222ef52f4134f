//! Display-ready view models.
//!
//! Templates only print strings; all number formatting happens here.

use mw_common::{ChartSeries, DerivedRow, PredictionResult, Record, SummaryMetrics, WEEKDAY_NAMES};

use crate::error::Result;

/// Shown in place of an undefined waste or efficiency.
pub const UNDEFINED: &str = "n/a";

/// Currency symbol for the loss figure.
pub const CURRENCY: &str = "₹";

fn two_dp(value: f64) -> String {
    format!("{value:.2}")
}

fn optional_two_dp(value: Option<f64>) -> String {
    value.map(two_dp).unwrap_or_else(|| UNDEFINED.to_string())
}

/// Values echoed back into an add or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub date: String,
    pub attendees: String,
    pub cooked: String,
    pub leftover: String,
}

impl RecordForm {
    pub fn new(
        date: impl Into<String>,
        attendees: impl Into<String>,
        cooked: impl Into<String>,
        leftover: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            attendees: attendees.into(),
            cooked: cooked.into(),
            leftover: leftover.into(),
        }
    }

    /// Empty form with the date pre-filled.
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &Record) -> Self {
        let obs = &record.observation;
        Self {
            date: obs.date_label(),
            attendees: obs.attendee_count.to_string(),
            cooked: obs.quantity_cooked.to_string(),
            leftover: obs.quantity_leftover.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCards {
    pub avg_waste: String,
    pub total_loss: String,
    pub avg_efficiency: String,
    pub record_count: String,
    pub total_consumption: String,
    pub per_attendee: String,
    pub excluded_note: Option<String>,
}

impl From<&SummaryMetrics> for MetricCards {
    fn from(m: &SummaryMetrics) -> Self {
        let excluded_note = (m.excluded_records > 0).then(|| {
            format!(
                "{} record(s) with no cooked quantity are left out of the waste and efficiency averages.",
                m.excluded_records
            )
        });
        Self {
            avg_waste: two_dp(m.avg_waste_percent),
            total_loss: format!("{CURRENCY}{:.2}", m.total_loss_cost),
            avg_efficiency: two_dp(m.avg_efficiency),
            record_count: m.record_count.to_string(),
            total_consumption: two_dp(m.total_consumption),
            per_attendee: format!("{:.3}", m.avg_consumption_per_attendee),
            excluded_note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: i64,
    pub date: String,
    pub weekday: String,
    pub attendees: String,
    pub cooked: String,
    pub leftover: String,
    pub consumption: String,
    pub waste: String,
    pub efficiency: String,
}

impl From<&DerivedRow> for RowView {
    fn from(row: &DerivedRow) -> Self {
        Self {
            id: row.id.0,
            date: row.date.clone(),
            weekday: row.weekday.clone(),
            attendees: row.attendee_count.to_string(),
            cooked: two_dp(row.quantity_cooked),
            leftover: two_dp(row.quantity_leftover),
            consumption: two_dp(row.consumption),
            waste: optional_two_dp(row.waste_percent),
            efficiency: optional_two_dp(row.efficiency),
        }
    }
}

pub fn row_views(rows: &[DerivedRow]) -> Vec<RowView> {
    rows.iter().map(RowView::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionView {
    pub attendees: String,
    pub weekday: String,
    pub prediction: String,
    pub recommended: String,
    pub score: String,
    pub margin: String,
    pub training_records: String,
}

impl From<&PredictionResult> for PredictionView {
    fn from(p: &PredictionResult) -> Self {
        Self {
            attendees: p.attendee_count.to_string(),
            weekday: p.weekday_name.clone(),
            prediction: two_dp(p.prediction),
            recommended: two_dp(p.recommended),
            score: two_dp(p.score),
            margin: format!("{:+.0}%", (p.safety_margin - 1.0) * 100.0),
            training_records: p.training_records.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayOption {
    pub index: u8,
    pub name: &'static str,
    pub selected: bool,
}

/// Monday → Sunday options with `selected` marked.
pub fn weekday_options(selected: Option<u8>) -> Vec<WeekdayOption> {
    WEEKDAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| WeekdayOption {
            index: i as u8,
            name,
            selected: selected == Some(i as u8),
        })
        .collect()
}

/// Chart series as a JSON literal safe to embed in a `<script>` block.
pub fn chart_json(series: &ChartSeries) -> Result<String> {
    Ok(serde_json::to_string(series)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_common::{LabeledSeries, RecordId};

    #[test]
    fn undefined_waste_prints_placeholder() {
        let row = DerivedRow {
            id: RecordId(3),
            date: "2025-06-01".into(),
            weekday: "Sunday".into(),
            attendee_count: 10,
            quantity_cooked: 0.0,
            quantity_leftover: 0.0,
            consumption: 0.0,
            waste_percent: None,
            efficiency: None,
        };
        let view = RowView::from(&row);
        assert_eq!(view.waste, UNDEFINED);
        assert_eq!(view.cooked, "0.00");
        assert_eq!(view.id, 3);
    }

    #[test]
    fn metric_cards_format() {
        let m = SummaryMetrics {
            avg_waste_percent: 9.5,
            total_loss_cost: 1500.0,
            avg_efficiency: 90.5,
            record_count: 40,
            total_consumption: 4012.3,
            avg_consumption_per_attendee: 0.2,
            excluded_records: 0,
        };
        let cards = MetricCards::from(&m);
        assert_eq!(cards.avg_waste, "9.50");
        assert_eq!(cards.total_loss, "₹1500.00");
        assert_eq!(cards.per_attendee, "0.200");
        assert!(cards.excluded_note.is_none());
    }

    #[test]
    fn margin_is_shown_as_percentage() {
        let p = PredictionResult {
            attendee_count: 500,
            weekday_index: 0,
            weekday_name: "Monday".into(),
            prediction: 100.0,
            recommended: 105.0,
            score: 87.25,
            safety_margin: 1.05,
            training_records: 12,
            coefficients: mw_common::ModelCoefficients {
                intercept: 0.0,
                per_attendee: 0.2,
                per_weekday_index: 0.0,
            },
        };
        assert_eq!(PredictionView::from(&p).margin, "+5%");
    }

    #[test]
    fn weekday_options_mark_selection() {
        let opts = weekday_options(Some(2));
        assert_eq!(opts.len(), 7);
        assert!(opts[2].selected);
        assert_eq!(opts.iter().filter(|o| o.selected).count(), 1);
        assert!(weekday_options(None).iter().all(|o| !o.selected));
    }

    #[test]
    fn chart_json_cannot_close_script() {
        let mut series = ChartSeries {
            waste_trend: LabeledSeries::default(),
            consumption: Default::default(),
            weekday_pattern: LabeledSeries::default(),
            attendance: LabeledSeries::default(),
        };
        series.weekday_pattern.push("</script>", 1.0);
        let json = chart_json(&series).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script>"));
    }
}
