//! Metrics engine: aggregate waste and efficiency figures.
//!
//! Pure functions over an immutable snapshot of observations. Division by
//! zero is handled explicitly:
//! - a row whose cooked quantity is not positive has no waste percentage and
//!   is left out of the waste/efficiency means (and counted in
//!   `excluded_records`);
//! - if no row has a defined waste, or total attendance is zero, the result
//!   is [`Error::DegenerateData`] rather than a NaN-filled summary.

use mw_common::{DerivedRow, Error, Observation, Record, Result, SummaryMetrics};
use mw_config::AnalyticsConfig;
use mw_math::{mean, neumaier_sum, round_to};
use tracing::debug;

/// Compute the dashboard summary.
///
/// Returns [`Error::NoData`] for an empty input.
pub fn summarize(observations: &[Observation], config: &AnalyticsConfig) -> Result<SummaryMetrics> {
    if observations.is_empty() {
        return Err(Error::NoData);
    }

    let wastes: Vec<f64> = observations
        .iter()
        .filter_map(Observation::waste_percent)
        .collect();
    let excluded_records = observations.len() - wastes.len();

    let (Some(avg_waste), Some(avg_efficiency)) = (
        mean(&wastes),
        mean(&wastes.iter().map(|w| 100.0 - w).collect::<Vec<_>>()),
    ) else {
        return Err(Error::DegenerateData(
            "no record has a positive cooked quantity".to_string(),
        ));
    };

    let total_attendees: u64 = observations.iter().map(|o| o.attendee_count as u64).sum();
    if total_attendees == 0 {
        return Err(Error::DegenerateData("total attendance is zero".to_string()));
    }

    let total_leftover = neumaier_sum(observations.iter().map(|o| o.quantity_leftover));
    let total_consumption = neumaier_sum(observations.iter().map(Observation::consumption));

    let metrics = SummaryMetrics {
        avg_waste_percent: round_to(avg_waste, 2),
        total_loss_cost: round_to(total_leftover * config.unit_cost, 2),
        avg_efficiency: round_to(avg_efficiency, 2),
        record_count: observations.len(),
        total_consumption: round_to(total_consumption, 2),
        avg_consumption_per_attendee: round_to(total_consumption / total_attendees as f64, 3),
        excluded_records,
    };

    debug!(
        records = metrics.record_count,
        excluded = excluded_records,
        avg_waste = metrics.avg_waste_percent,
        "computed summary metrics"
    );
    Ok(metrics)
}

/// Attach rounded derived columns to each record, preserving input order.
pub fn derive_rows(records: &[Record]) -> Vec<DerivedRow> {
    records
        .iter()
        .map(|record| {
            let obs = &record.observation;
            DerivedRow {
                id: record.id,
                date: obs.date_label(),
                weekday: obs.weekday_name().to_string(),
                attendee_count: obs.attendee_count,
                quantity_cooked: obs.quantity_cooked,
                quantity_leftover: obs.quantity_leftover,
                consumption: round_to(obs.consumption(), 2),
                waste_percent: obs.waste_percent().map(|w| round_to(w, 2)),
                efficiency: obs.efficiency().map(|e| round_to(e, 2)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mw_common::RecordId;
    use proptest::prelude::*;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    fn obs(offset: u64, attendees: u32, cooked: f64, leftover: f64) -> Observation {
        Observation::new(day(offset), attendees, cooked, leftover)
    }

    #[test]
    fn empty_is_no_data() {
        let err = summarize(&[], &AnalyticsConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NoData));
    }

    #[test]
    fn hand_computed_summary() {
        let data = vec![
            obs(0, 100, 50.0, 5.0),  // waste 10%, consumption 45
            obs(1, 200, 80.0, 20.0), // waste 25%, consumption 60
        ];
        let m = summarize(&data, &AnalyticsConfig::default()).unwrap();
        assert_eq!(m.record_count, 2);
        assert_eq!(m.avg_waste_percent, 17.5);
        assert_eq!(m.avg_efficiency, 82.5);
        assert_eq!(m.total_loss_cost, 1500.0); // 25 kg × 60
        assert_eq!(m.total_consumption, 105.0);
        assert_eq!(m.avg_consumption_per_attendee, 0.35);
        assert_eq!(m.excluded_records, 0);
    }

    #[test]
    fn unit_cost_is_configurable() {
        let config = AnalyticsConfig {
            unit_cost: 10.0,
            ..AnalyticsConfig::default()
        };
        let m = summarize(&[obs(0, 10, 10.0, 2.5)], &config).unwrap();
        assert_eq!(m.total_loss_cost, 25.0);
    }

    #[test]
    fn zero_cooked_rows_are_excluded_from_means() {
        let data = vec![obs(0, 100, 50.0, 5.0), obs(1, 100, 0.0, 0.0)];
        let m = summarize(&data, &AnalyticsConfig::default()).unwrap();
        assert_eq!(m.record_count, 2);
        assert_eq!(m.excluded_records, 1);
        assert_eq!(m.avg_waste_percent, 10.0);
        assert_eq!(m.avg_efficiency, 90.0);
    }

    #[test]
    fn all_rows_zero_cooked_is_degenerate() {
        let data = vec![obs(0, 100, 0.0, 0.0), obs(1, 50, 0.0, 0.0)];
        let err = summarize(&data, &AnalyticsConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateData(_)));
    }

    #[test]
    fn zero_attendance_is_degenerate() {
        let data = vec![obs(0, 0, 10.0, 1.0)];
        let err = summarize(&data, &AnalyticsConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateData(ref r) if r.contains("attendance")));
    }

    #[test]
    fn derived_rows_round_and_keep_order() {
        let records = vec![
            Record::new(RecordId(2), obs(3, 10, 3.0, 1.0)),
            Record::new(RecordId(1), obs(0, 10, 0.0, 0.0)),
        ];
        let rows = derive_rows(&records);
        assert_eq!(rows[0].id, RecordId(2));
        assert_eq!(rows[0].waste_percent, Some(33.33));
        assert_eq!(rows[0].efficiency, Some(66.67));
        assert_eq!(rows[0].consumption, 2.0);
        assert_eq!(rows[0].date, "2025-01-04");
        assert_eq!(rows[1].waste_percent, None);
    }

    fn valid_observations() -> impl Strategy<Value = Vec<Observation>> {
        proptest::collection::vec((1u32..1000, 0.1f64..500.0, 0.0f64..=1.0), 1..60).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (a, cooked, frac))| obs(i as u64, a, cooked, cooked * frac))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn waste_and_efficiency_sum_to_hundred(data in valid_observations()) {
            let m = summarize(&data, &AnalyticsConfig::default()).unwrap();
            prop_assert!((m.avg_waste_percent + m.avg_efficiency - 100.0).abs() <= 0.011);
            prop_assert_eq!(m.record_count, data.len());
            prop_assert!(m.avg_waste_percent >= 0.0 && m.avg_waste_percent <= 100.0);
        }

        #[test]
        fn consumption_never_exceeds_cooked(data in valid_observations()) {
            for o in &data {
                let c = o.consumption();
                prop_assert!(c >= -1e-9 && c <= o.quantity_cooked + 1e-9);
            }
        }
    }
}
