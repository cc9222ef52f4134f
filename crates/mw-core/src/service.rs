//! Service layer: the operations the CLI and HTTP front ends call.
//!
//! Each call validates its input, reads a fresh snapshot from the store and
//! runs the pure engines over it. Nothing is cached between calls.

use mw_common::{
    ChartSeries, Dashboard, DerivedRow, Error, Observation, PredictionResult, Record, RecordId,
    Result, SummaryMetrics,
};
use mw_config::{AnalyticsConfig, Config};
use mw_store::{RecordStore, SortOrder};
use tracing::{info, warn};

use crate::charts::build_chart_series;
use crate::metrics::{derive_rows, summarize};
use crate::predict::{fit_and_predict, today_weekday_index};
use crate::validate::{validate_attendee_count, validate_weekday, ObservationInput};

#[derive(Debug, Clone)]
pub struct MessService {
    store: RecordStore,
    analytics: AnalyticsConfig,
}

impl MessService {
    pub fn new(store: RecordStore, analytics: AnalyticsConfig) -> Self {
        Self { store, analytics }
    }

    /// Open the store named by the configuration.
    pub fn open(config: &Config) -> Result<Self> {
        let store = RecordStore::open(&config.store.database_path)?;
        Ok(Self::new(store, config.analytics.clone()))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn analytics(&self) -> &AnalyticsConfig {
        &self.analytics
    }

    pub fn add(&self, input: &ObservationInput) -> Result<RecordId> {
        let observation = input.validate().inspect_err(|e| {
            warn!(error = %e, "rejected new record");
        })?;
        let id = self.store.insert(&observation)?;
        info!(%id, date = %observation.date, "record added");
        Ok(id)
    }

    /// Insert already-validated observations in one transaction.
    pub fn add_many(&self, observations: &[Observation]) -> Result<Vec<RecordId>> {
        let ids = self.store.insert_many(observations)?;
        info!(count = ids.len(), "records added in batch");
        Ok(ids)
    }

    /// Overwrite all four fields of an existing record.
    pub fn edit(&self, id: RecordId, input: &ObservationInput) -> Result<()> {
        let observation = input.validate().inspect_err(|e| {
            warn!(%id, error = %e, "rejected record update");
        })?;
        if !self.store.update(id, &observation)? {
            return Err(Error::RecordNotFound { id });
        }
        info!(%id, "record updated");
        Ok(())
    }

    /// Remove a record. Deleting a missing ID is not an error; the return
    /// value says whether a row went away.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            info!(%id, "record deleted");
        } else {
            warn!(%id, "delete requested for missing record");
        }
        Ok(removed)
    }

    pub fn get(&self, id: RecordId) -> Result<Record> {
        self.store.get(id)?.ok_or(Error::RecordNotFound { id })
    }

    pub fn list_all(&self, order: SortOrder) -> Result<Vec<Record>> {
        Ok(self.store.list(order)?)
    }

    pub fn list_rows(&self, order: SortOrder) -> Result<Vec<DerivedRow>> {
        Ok(derive_rows(&self.list_all(order)?))
    }

    pub fn get_dashboard_metrics(&self) -> Result<SummaryMetrics> {
        summarize(&self.observations(SortOrder::Descending)?, &self.analytics)
    }

    /// Metrics plus the newest-first table, from one snapshot.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let records = self.list_all(SortOrder::Descending)?;
        let observations: Vec<Observation> =
            records.iter().map(|r| r.observation.clone()).collect();
        let metrics = summarize(&observations, &self.analytics)?;
        Ok(Dashboard {
            metrics,
            rows: derive_rows(&records),
        })
    }

    pub fn get_chart_data(&self) -> Result<ChartSeries> {
        build_chart_series(&self.observations(SortOrder::Ascending)?)
    }

    /// Forecast consumption. `weekday` defaults to today's local weekday.
    pub fn predict(&self, attendee_count: i64, weekday: Option<i64>) -> Result<PredictionResult> {
        let attendee_count = validate_attendee_count(attendee_count)?;
        let weekday_index = match weekday {
            Some(w) => validate_weekday(w)?,
            None => today_weekday_index(),
        };
        let observations = self.observations(SortOrder::Ascending)?;
        fit_and_predict(&observations, attendee_count, weekday_index, &self.analytics)
    }

    fn observations(&self, order: SortOrder) -> Result<Vec<Observation>> {
        Ok(self
            .list_all(order)?
            .into_iter()
            .map(|r| r.observation)
            .collect())
    }
}
