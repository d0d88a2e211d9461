//! Date and datetime generators.

use super::GenerationClock;
use chrono::{DateTime, Duration};
use okoshi_core::quote;
use rand::Rng;

/// Format used for datetime literals.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A random calendar date in `[today - 100 years, today)`, quoted.
pub fn generate_date<R: Rng>(rng: &mut R, clock: &GenerationClock) -> String {
    let first = clock.first_day();
    let days = (clock.today() - first).num_days();

    let date = if days > 0 {
        first + Duration::days(rng.gen_range(0..days))
    } else {
        first
    };
    quote(&date.format("%Y-%m-%d").to_string())
}

/// A random second in `[now - 100 years, now)`, quoted.
pub fn generate_datetime<R: Rng>(rng: &mut R, clock: &GenerationClock) -> String {
    let start = clock.window_start().timestamp();
    let end = clock.instant().timestamp();

    let dt = if start < end {
        DateTime::from_timestamp(rng.gen_range(start..end), 0).unwrap_or(clock.instant())
    } else {
        clock.instant()
    };
    quote(&dt.format(DATETIME_FORMAT).to_string())
}
