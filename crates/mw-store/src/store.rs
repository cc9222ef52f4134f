use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use mw_common::{Observation, Record, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT id, date, students, cooked, leftover FROM records";

/// Date ordering for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first, for time series.
    Ascending,
    /// Newest first, for record tables.
    #[default]
    Descending,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ORDER BY date ASC, id ASC",
            SortOrder::Descending => "ORDER BY date DESC, id DESC",
        }
    }
}

/// Handle to the records database.
///
/// Holds only the path; each method opens a fresh connection.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open (creating if needed) the database at `path` and ensure the
    /// records table exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self { path };
        store.init_schema()?;
        info!(path = %store.path.display(), "record store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT,
                students INTEGER,
                cooked REAL,
                leftover REAL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert one observation, returning its new ID.
    pub fn insert(&self, observation: &Observation) -> Result<RecordId> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO records (date, students, cooked, leftover) VALUES (?1, ?2, ?3, ?4)",
            params![
                observation.date.format(DATE_FORMAT).to_string(),
                observation.attendee_count,
                observation.quantity_cooked,
                observation.quantity_leftover,
            ],
        )?;
        let id = RecordId(conn.last_insert_rowid());
        debug!(%id, date = %observation.date, "inserted record");
        Ok(id)
    }

    /// Insert many observations in a single transaction.
    pub fn insert_many(&self, observations: &[Observation]) -> Result<Vec<RecordId>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(observations.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (date, students, cooked, leftover) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for observation in observations {
                stmt.execute(params![
                    observation.date.format(DATE_FORMAT).to_string(),
                    observation.attendee_count,
                    observation.quantity_cooked,
                    observation.quantity_leftover,
                ])?;
                ids.push(RecordId(tx.last_insert_rowid()));
            }
        }
        tx.commit()?;
        debug!(count = ids.len(), "inserted records in batch");
        Ok(ids)
    }

    /// Overwrite all four fields of a record. Returns `false` when no row has
    /// that ID.
    pub fn update(&self, id: RecordId, observation: &Observation) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE records SET date = ?1, students = ?2, cooked = ?3, leftover = ?4 WHERE id = ?5",
            params![
                observation.date.format(DATE_FORMAT).to_string(),
                observation.attendee_count,
                observation.quantity_cooked,
                observation.quantity_leftover,
                id.0,
            ],
        )?;
        debug!(%id, changed, "updated record");
        Ok(changed > 0)
    }

    /// Delete a record. Returns `false` when no row had that ID.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM records WHERE id = ?1", params![id.0])?;
        debug!(%id, changed, "deleted record");
        Ok(changed > 0)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let record = stmt.query_row(params![id.0], record_from_row).optional()?;
        Ok(record)
    }

    pub fn list(&self, order: SortOrder) -> Result<Vec<Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {}", order.sql()))?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = records.len(), ?order, "listed records");
        Ok(records)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    let id: i64 = row.get(0)?;
    let date_text: String = row.get(1)?;
    let date = parse_stored_date(&date_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("record {id}: unparseable date {date_text:?}").into(),
        )
    })?;

    let students: i64 = row.get(2)?;
    let attendee_count = u32::try_from(students).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(Record::new(
        RecordId(id),
        Observation {
            date,
            attendee_count,
            quantity_cooked: row.get(3)?,
            quantity_leftover: row.get(4)?,
        },
    ))
}

/// Parse a stored date, tolerating a trailing time component from rows
/// written by other tools.
fn parse_stored_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}
