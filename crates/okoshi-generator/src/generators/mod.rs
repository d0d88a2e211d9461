//! Built-in value generators, one per logical type.
//!
//! Each generator returns a rendered literal: numbers bare, everything else
//! escaped and single-quoted.

pub mod numeric;
pub mod string;
pub mod timestamp;

use chrono::{DateTime, Months, NaiveDate, Utc};
use okoshi_core::LogicalType;
use rand::Rng;

/// Years of history covered by date and datetime generators.
pub const HISTORY_YEARS: u32 = 100;

/// The "now" anchor for a run.
///
/// Captured once so every date and datetime in a run is drawn from the same
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationClock {
    now: DateTime<Utc>,
}

impl GenerationClock {
    /// Anchor the clock at the current time.
    pub fn now() -> Self {
        Self::fixed(Utc::now())
    }

    /// Anchor the clock at a fixed instant.
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Start of the datetime window, `HISTORY_YEARS` before now.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.now
            .checked_sub_months(Months::new(HISTORY_YEARS * 12))
            .unwrap_or(self.now)
    }

    /// First day of the date window, `HISTORY_YEARS` before today.
    pub fn first_day(&self) -> NaiveDate {
        self.today()
            .checked_sub_months(Months::new(HISTORY_YEARS * 12))
            .unwrap_or_else(|| self.today())
    }
}

impl Default for GenerationClock {
    fn default() -> Self {
        Self::now()
    }
}

/// Generate one rendered literal for the given logical type.
pub fn generate_value<R: Rng>(
    rng: &mut R,
    clock: &GenerationClock,
    logical_type: LogicalType,
    limit: u32,
) -> String {
    match logical_type {
        LogicalType::Integer => numeric::generate_integer(rng, limit),
        LogicalType::Float => numeric::generate_float(rng, limit),
        LogicalType::Boolean => numeric::generate_boolean(rng),
        LogicalType::String => string::generate_string(rng, limit),
        LogicalType::Text => string::generate_text(rng, limit),
        LogicalType::Json => string::generate_json(),
        LogicalType::Date => timestamp::generate_date(rng, clock),
        LogicalType::Datetime => timestamp::generate_datetime(rng, clock),
    }
}
