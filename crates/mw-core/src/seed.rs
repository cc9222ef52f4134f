//! Synthetic daily records for demos and tests.
//!
//! Weekends see lower attendance than weekdays; per-head consumption and the
//! waste ratio are drawn uniformly. Leftover is a percentage of consumption,
//! so the stored `leftover / cooked` ratio sits slightly below the drawn
//! percentage.

use chrono::{Datelike, Days, NaiveDate};
use mw_common::Observation;
use mw_math::round_to;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOptions {
    pub count: usize,
    pub start: NaiveDate,
    /// Fixed RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            count: 40,
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            seed: None,
        }
    }
}

/// One observation per consecutive day starting at `options.start`.
pub fn generate(options: &SeedOptions) -> Vec<Observation> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    (0..options.count)
        .filter_map(|i| options.start.checked_add_days(Days::new(i as u64)))
        .map(|date| synthesize_day(&mut rng, date))
        .collect()
}

fn synthesize_day<R: Rng>(rng: &mut R, date: NaiveDate) -> Observation {
    let weekend = date.weekday().num_days_from_monday() >= 5;
    let attendees: u32 = if weekend {
        rng.random_range(400..470)
    } else {
        rng.random_range(480..550)
    };

    let per_head = rng.random_range(0.18..0.22);
    let consumption = attendees as f64 * per_head;
    let waste_percent = rng.random_range(5.0..15.0);
    let leftover = consumption * waste_percent / 100.0;

    Observation::new(
        date,
        attendees,
        round_to(consumption + leftover, 2),
        round_to(leftover, 2),
    )
}
