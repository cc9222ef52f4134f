//! Service-level scenarios against a real SQLite file.
//!
//! Validates:
//! - add / edit / delete are reflected by list
//! - rejected input leaves the store unchanged
//! - empty-store behaviour of metrics, charts and prediction
//! - the 9 / 10 record training threshold
//! - the 40-day synthetic history lands in the expected metric ranges

use mw_common::{Error, RecordId};
use mw_config::{AnalyticsConfig, Config};
use mw_core::seed::{generate, SeedOptions};
use mw_core::{MessService, ObservationInput};
use mw_store::{RecordStore, SortOrder};
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

fn open_service() -> (TempDir, MessService) {
    let dir = tempdir().expect("tempdir");
    let store = RecordStore::open(dir.path().join("mess_data.db")).expect("open store");
    (dir, MessService::new(store, AnalyticsConfig::default()))
}

fn seed(service: &MessService, count: usize) {
    let observations = generate(&SeedOptions {
        count,
        seed: Some(2025),
        ..SeedOptions::default()
    });
    service.add_many(&observations).expect("seed records");
}

// ============================================================================
// CRUD
// ============================================================================

#[test]
fn add_then_list_surfaces_values() {
    let (_dir, svc) = open_service();
    let id = svc
        .add(&ObservationInput::new("2025-06-01", 500, 100.0, 9.5))
        .unwrap();

    let records = svc.list_all(SortOrder::Descending).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].observation.attendee_count, 500);
    assert_eq!(records[0].observation.quantity_cooked, 100.0);
    assert_eq!(records[0].observation.quantity_leftover, 9.5);
}

#[test]
fn edit_overwrites_all_fields() {
    let (_dir, svc) = open_service();
    let id = svc
        .add(&ObservationInput::new("2025-06-01", 500, 100.0, 9.5))
        .unwrap();
    svc.edit(id, &ObservationInput::new("2025-06-03", 410, 88.0, 2.0))
        .unwrap();

    let rows = svc.list_rows(SortOrder::Descending).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-06-03");
    assert_eq!(rows[0].weekday, "Tuesday");
    assert_eq!(rows[0].attendee_count, 410);
    assert_eq!(rows[0].consumption, 86.0);
}

#[test]
fn edit_missing_record_is_not_found() {
    let (_dir, svc) = open_service();
    let err = svc
        .edit(RecordId(42), &ObservationInput::new("2025-06-01", 1, 1.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { id } if id == RecordId(42)));
}

#[test]
fn delete_removes_from_list_and_tolerates_missing_ids() {
    let (_dir, svc) = open_service();
    let keep = svc
        .add(&ObservationInput::new("2025-06-01", 500, 100.0, 9.5))
        .unwrap();
    let gone = svc
        .add(&ObservationInput::new("2025-06-02", 510, 101.0, 8.0))
        .unwrap();

    assert!(svc.delete(gone).unwrap());
    assert!(!svc.delete(gone).unwrap());

    let ids: Vec<RecordId> = svc
        .list_all(SortOrder::Descending)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![keep]);
    assert!(matches!(svc.get(gone), Err(Error::RecordNotFound { .. })));
}

#[test]
fn leftover_above_cooked_is_rejected_and_store_unchanged() {
    let (_dir, svc) = open_service();
    svc.add(&ObservationInput::new("2025-05-31", 480, 90.0, 5.0))
        .unwrap();

    let err = svc
        .add(&ObservationInput::new("2025-06-01", 500, 100.0, 120.0))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(svc.store().count().unwrap(), 1);
}

#[test]
fn rejected_edit_leaves_record_untouched() {
    let (_dir, svc) = open_service();
    let id = svc
        .add(&ObservationInput::new("2025-06-01", 500, 100.0, 9.5))
        .unwrap();
    let before = svc.get(id).unwrap();

    let err = svc
        .edit(id, &ObservationInput::new("2025-06-01", -1, 100.0, 9.5))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(svc.get(id).unwrap(), before);
}

// ============================================================================
// Empty store
// ============================================================================

#[test]
fn empty_store_signals_no_data() {
    let (_dir, svc) = open_service();
    assert!(matches!(svc.get_dashboard_metrics(), Err(Error::NoData)));
    assert!(matches!(svc.dashboard(), Err(Error::NoData)));
    assert!(matches!(svc.get_chart_data(), Err(Error::NoData)));
    assert!(matches!(
        svc.predict(500, Some(0)),
        Err(Error::InsufficientData {
            required: 10,
            available: 0
        })
    ));
}

// ============================================================================
// Prediction threshold
// ============================================================================

#[test]
fn nine_records_are_not_enough() {
    let (_dir, svc) = open_service();
    seed(&svc, 9);
    let err = svc.predict(500, None).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientData {
            required: 10,
            available: 9
        }
    ));
    assert!(err.user_message().contains("10"));
}

#[test]
fn ten_records_predict() {
    let (_dir, svc) = open_service();
    seed(&svc, 10);
    let result = svc.predict(500, None).unwrap();

    assert!(result.prediction.is_finite());
    assert!(
        (result.recommended - result.prediction * 1.05).abs() <= 0.01,
        "recommended {} vs prediction {}",
        result.recommended,
        result.prediction
    );
    assert!((0.0..=100.0).contains(&result.score));
    assert!(result.weekday_index <= 6);
    assert_eq!(result.training_records, 10);
}

#[test]
fn predict_validates_inputs() {
    let (_dir, svc) = open_service();
    seed(&svc, 12);
    assert!(matches!(svc.predict(0, Some(1)), Err(Error::Validation(_))));
    assert!(matches!(svc.predict(500, Some(7)), Err(Error::Validation(_))));
    assert!(svc.predict(500, Some(6)).is_ok());
}

// ============================================================================
// Synthetic history
// ============================================================================

#[test]
fn forty_day_history_metrics() {
    let (_dir, svc) = open_service();
    seed(&svc, 40);

    let metrics = svc.get_dashboard_metrics().unwrap();
    assert_eq!(metrics.record_count, 40);
    assert!(
        (5.0..=15.0).contains(&metrics.avg_waste_percent),
        "avg waste {}",
        metrics.avg_waste_percent
    );
    assert!((metrics.avg_waste_percent + metrics.avg_efficiency - 100.0).abs() <= 0.011);
    assert!(metrics.avg_consumption_per_attendee >= 0.179);
    assert!(metrics.avg_consumption_per_attendee <= 0.221);
    assert_eq!(metrics.excluded_records, 0);

    let charts = svc.get_chart_data().unwrap();
    assert_eq!(charts.waste_trend.len(), 40);
    assert_eq!(charts.weekday_pattern.labels.len(), 7);
    assert_eq!(charts.weekday_pattern.labels[0], "Monday");
    assert_eq!(charts.attendance.labels.first().unwrap(), "2025-01-01");

    let dashboard = svc.dashboard().unwrap();
    assert_eq!(dashboard.rows.len(), 40);
    assert_eq!(dashboard.rows[0].date, "2025-02-09");
}

#[test]
fn open_from_config_uses_database_path() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.store.database_path = dir.path().join("nested").join("mess.db");

    let svc = MessService::open(&config).unwrap();
    svc.add(&ObservationInput::new("2025-06-01", 1, 1.0, 0.0))
        .unwrap();
    assert!(config.store.database_path.is_file());
}
