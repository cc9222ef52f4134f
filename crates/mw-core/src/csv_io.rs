//! CSV import and export.
//!
//! Files use the `date,students,cooked,leftover` header, the same layout as
//! the sample data generator writes. Imported rows go through the same
//! boundary validation as interactive input; bad rows are reported, not
//! fatal.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use mw_common::{Error, Observation, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::validate::ObservationInput;

/// Row as read from disk; every field is text until validated.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    students: String,
    cooked: String,
    leftover: String,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    date: String,
    students: u32,
    cooked: f64,
    leftover: f64,
}

/// A row that failed parsing or validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// 1-based line number in the file, counting the header.
    pub line: u64,
    pub reason: String,
}

/// Outcome of reading a CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub accepted: Vec<Observation>,
    pub rejected: Vec<RejectedRow>,
}

/// Read and validate observations from CSV.
pub fn read_observations<R: Read>(reader: R) -> Result<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = ImportReport::default();
    for (index, result) in csv_reader.deserialize::<RawRow>().enumerate() {
        let line = index as u64 + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(csv_error(e)),
            Err(e) => {
                warn!(line, error = %e, "unreadable CSV row");
                report.rejected.push(RejectedRow {
                    line,
                    reason: format!("malformed row: {e}"),
                });
                continue;
            }
        };

        match ObservationInput::from_fields(&row.date, &row.students, &row.cooked, &row.leftover)
            .and_then(|input| input.validate())
        {
            Ok(observation) => report.accepted.push(observation),
            Err(e) => {
                warn!(line, error = %e, "rejected CSV row");
                report.rejected.push(RejectedRow {
                    line,
                    reason: e.user_message(),
                });
            }
        }
    }

    debug!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "read CSV"
    );
    Ok(report)
}

pub fn read_observations_file(path: &Path) -> Result<ImportReport> {
    let file = File::open(path)?;
    read_observations(file)
}

/// Write observations with a header row, in the order given.
pub fn write_observations<W: Write>(writer: W, observations: &[Observation]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for obs in observations {
        csv_writer
            .serialize(CsvRow {
                date: obs.date_label(),
                students: obs.attendee_count,
                cooked: obs.quantity_cooked,
                leftover: obs.quantity_leftover,
            })
            .map_err(csv_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_observations_file(path: &Path, observations: &[Observation]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_observations(file, observations)?;
    debug!(path = %path.display(), rows = observations.len(), "wrote CSV");
    Ok(())
}

fn csv_error(e: csv::Error) -> Error {
    if e.is_io_error() {
        Error::Io(e.into())
    } else {
        Error::Validation(format!("malformed CSV: {e}"))
    }
}
