//! Result types produced by the analytics engines.
//!
//! Kept here rather than next to the engines so that renderers can consume
//! them without depending on the engine crate.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Aggregate figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Mean waste percentage over rows with a defined waste (2 dp).
    pub avg_waste_percent: f64,
    /// Total leftover multiplied by the configured unit cost (2 dp).
    pub total_loss_cost: f64,
    /// Mean efficiency over rows with a defined waste (2 dp).
    pub avg_efficiency: f64,
    pub record_count: usize,
    /// Sum of consumption (2 dp).
    pub total_consumption: f64,
    /// Total consumption divided by total attendance (3 dp).
    pub avg_consumption_per_attendee: f64,
    /// Rows left out of the waste and efficiency means because their cooked
    /// quantity was not positive.
    pub excluded_records: usize,
}

/// One record with its derived columns, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub id: RecordId,
    pub date: String,
    pub weekday: String,
    pub attendee_count: u32,
    pub quantity_cooked: f64,
    pub quantity_leftover: f64,
    pub consumption: f64,
    pub waste_percent: Option<f64>,
    pub efficiency: Option<f64>,
}

/// A label sequence with one value per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries<T> {
    pub labels: Vec<String>,
    pub data: Vec<T>,
}

impl<T> Default for LabeledSeries<T> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<T> LabeledSeries<T> {
    pub fn push(&mut self, label: impl Into<String>, value: T) {
        self.labels.push(label.into());
        self.data.push(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Cooked / consumed / leftover per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSeries {
    pub labels: Vec<String>,
    pub cooked: Vec<f64>,
    pub consumed: Vec<f64>,
    pub leftover: Vec<f64>,
}

/// Everything the analytics page plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Waste percent per date; `None` where the waste is undefined.
    pub waste_trend: LabeledSeries<Option<f64>>,
    pub consumption: ConsumptionSeries,
    /// Mean waste percent per weekday name, Monday first, present days only.
    pub weekday_pattern: LabeledSeries<f64>,
    pub attendance: LabeledSeries<u32>,
}

/// Fitted coefficients of the consumption model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
    pub intercept: f64,
    pub per_attendee: f64,
    pub per_weekday_index: f64,
}

/// Forecast for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub attendee_count: u32,
    pub weekday_index: u8,
    pub weekday_name: String,
    /// Predicted consumption (2 dp).
    pub prediction: f64,
    /// Prediction times the safety margin (2 dp).
    pub recommended: f64,
    /// In-sample R² as a percentage (2 dp).
    pub score: f64,
    pub safety_margin: f64,
    pub training_records: usize,
    pub coefficients: ModelCoefficients,
}

/// Dashboard payload: metrics plus the newest-first record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub metrics: SummaryMetrics,
    pub rows: Vec<DerivedRow>,
}
