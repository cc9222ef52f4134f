//! Prediction engine: next-day consumption forecast.
//!
//! Stateless: every call refits an ordinary least-squares model from the
//! full observation set, mapping (attendee count, weekday index) to
//! consumption. There is deliberately no feature scaling, outlier rejection
//! or held-out set; the score is the in-sample R².

use chrono::{Datelike, Local};
use mw_common::{weekday_name, Error, ModelCoefficients, Observation, PredictionResult, Result};
use mw_config::AnalyticsConfig;
use mw_math::{fit_two_feature, round_to, OlsFit};
use tracing::{debug, info};

/// A fitted consumption model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionModel {
    fit: OlsFit,
}

impl ConsumptionModel {
    /// Fit over every observation.
    ///
    /// Fails with [`Error::InsufficientData`] below the configured minimum.
    pub fn fit(observations: &[Observation], config: &AnalyticsConfig) -> Result<Self> {
        let required = config.min_training_records;
        if observations.len() < required {
            return Err(Error::InsufficientData {
                required,
                available: observations.len(),
            });
        }

        let features: Vec<[f64; 2]> = observations
            .iter()
            .map(|o| [o.attendee_count as f64, o.weekday_index() as f64])
            .collect();
        let targets: Vec<f64> = observations.iter().map(Observation::consumption).collect();

        let fit = fit_two_feature(&features, &targets).ok_or_else(|| {
            Error::ModelFit("training data contains non-finite quantities".to_string())
        })?;

        debug!(
            n = fit.n,
            intercept = fit.intercept,
            per_attendee = fit.coefficients[0],
            per_weekday = fit.coefficients[1],
            r_squared = fit.r_squared,
            "fitted consumption model"
        );
        Ok(Self { fit })
    }

    pub fn predict(&self, attendee_count: u32, weekday_index: u8) -> f64 {
        self.fit.predict([attendee_count as f64, weekday_index as f64])
    }

    pub fn r_squared(&self) -> f64 {
        self.fit.r_squared
    }

    pub fn training_records(&self) -> usize {
        self.fit.n
    }

    pub fn coefficients(&self) -> ModelCoefficients {
        ModelCoefficients {
            intercept: self.fit.intercept,
            per_attendee: self.fit.coefficients[0],
            per_weekday_index: self.fit.coefficients[1],
        }
    }
}

/// Refit the model and forecast one day.
///
/// The caller validates `attendee_count`; an out-of-range weekday is still
/// rejected here since it has no name to report.
pub fn fit_and_predict(
    observations: &[Observation],
    attendee_count: u32,
    weekday_index: u8,
    config: &AnalyticsConfig,
) -> Result<PredictionResult> {
    let weekday = weekday_name(weekday_index).ok_or_else(|| {
        Error::Validation(format!(
            "Weekday must be between 0 (Monday) and 6 (Sunday), got {weekday_index}"
        ))
    })?;

    let model = ConsumptionModel::fit(observations, config)?;
    let raw = model.predict(attendee_count, weekday_index);
    let recommended = raw * config.safety_margin;

    let result = PredictionResult {
        attendee_count,
        weekday_index,
        weekday_name: weekday.to_string(),
        prediction: round_to(raw, 2),
        recommended: round_to(recommended, 2),
        score: round_to(model.r_squared() * 100.0, 2),
        safety_margin: config.safety_margin,
        training_records: model.training_records(),
        coefficients: model.coefficients(),
    };

    info!(
        attendees = attendee_count,
        weekday,
        prediction = result.prediction,
        recommended = result.recommended,
        score = result.score,
        "prediction made"
    );
    Ok(result)
}

/// Weekday index (0 = Monday) of the current local date.
pub fn today_weekday_index() -> u8 {
    Local::now().weekday().num_days_from_monday() as u8
}
