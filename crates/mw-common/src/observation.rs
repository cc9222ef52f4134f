//! Daily observations and their derived columns.
//!
//! An [`Observation`] is what staff type in for one day. Everything else
//! (consumption, waste, efficiency, weekday) is computed on demand and never
//! persisted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Weekday names in Monday-first order, indexed by `weekday_index`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Name for a Monday-based weekday index (0 = Monday .. 6 = Sunday).
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(index as usize).copied()
}

/// One day's recorded figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub attendee_count: u32,
    pub quantity_cooked: f64,
    pub quantity_leftover: f64,
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        attendee_count: u32,
        quantity_cooked: f64,
        quantity_leftover: f64,
    ) -> Self {
        Self {
            date,
            attendee_count,
            quantity_cooked,
            quantity_leftover,
        }
    }

    pub fn consumption(&self) -> f64 {
        self.quantity_cooked - self.quantity_leftover
    }

    /// Waste percentage, undefined for rows with a non-positive cooked
    /// quantity (only reachable through out-of-band inserts).
    pub fn waste_percent(&self) -> Option<f64> {
        if self.quantity_cooked > 0.0 {
            Some(self.quantity_leftover / self.quantity_cooked * 100.0)
        } else {
            None
        }
    }

    pub fn efficiency(&self) -> Option<f64> {
        self.waste_percent().map(|w| 100.0 - w)
    }

    pub fn weekday_index(&self) -> u8 {
        self.date.weekday().num_days_from_monday() as u8
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday_index() as usize]
    }

    /// `YYYY-MM-DD` label used by every time-series view.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A stored observation together with its store-assigned ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub observation: Observation,
}

impl Record {
    pub fn new(id: RecordId, observation: Observation) -> Self {
        Self { id, observation }
    }
}
