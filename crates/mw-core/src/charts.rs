//! Chart data builder: reshape observations into plot-ready series.

use mw_common::{
    ChartSeries, ConsumptionSeries, Error, LabeledSeries, Observation, Result, WEEKDAY_NAMES,
};
use mw_math::round_to;
use tracing::debug;

/// Build all four chart series.
///
/// Observations are plotted oldest first; the input is sorted by date (stably)
/// so callers may pass any order. Returns [`Error::NoData`] for an empty
/// input.
pub fn build_chart_series(observations: &[Observation]) -> Result<ChartSeries> {
    if observations.is_empty() {
        return Err(Error::NoData);
    }

    let mut ordered: Vec<&Observation> = observations.iter().collect();
    ordered.sort_by_key(|o| o.date);

    let mut waste_trend = LabeledSeries::default();
    let mut consumption = ConsumptionSeries::default();
    let mut attendance = LabeledSeries::default();

    for obs in &ordered {
        let label = obs.date_label();
        waste_trend.push(label.clone(), obs.waste_percent().map(|w| round_to(w, 2)));

        consumption.labels.push(label.clone());
        consumption.cooked.push(round_to(obs.quantity_cooked, 2));
        consumption.consumed.push(round_to(obs.consumption(), 2));
        consumption.leftover.push(round_to(obs.quantity_leftover, 2));

        attendance.push(label, obs.attendee_count);
    }

    let weekday_pattern = weekday_pattern(&ordered);

    debug!(
        points = ordered.len(),
        weekdays = weekday_pattern.len(),
        "built chart series"
    );

    Ok(ChartSeries {
        waste_trend,
        consumption,
        weekday_pattern,
        attendance,
    })
}

/// Mean waste per weekday, Monday → Sunday, only for weekdays that have at
/// least one defined waste value.
fn weekday_pattern(observations: &[&Observation]) -> LabeledSeries<f64> {
    let mut sums = [0.0f64; 7];
    let mut counts = [0usize; 7];
    for obs in observations {
        if let Some(waste) = obs.waste_percent() {
            let idx = obs.weekday_index() as usize;
            sums[idx] += waste;
            counts[idx] += 1;
        }
    }

    let mut pattern = LabeledSeries::default();
    for (idx, name) in WEEKDAY_NAMES.iter().enumerate() {
        if counts[idx] > 0 {
            pattern.push(*name, round_to(sums[idx] / counts[idx] as f64, 2));
        }
    }
    pattern
}
