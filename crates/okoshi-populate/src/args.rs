//! Common CLI argument definitions shared by all populators.

use crate::options::{PopulateOptions, RunConfig};
use clap::Args;
use okoshi_core::{ConfigError, ReferenceSpec};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Common arguments shared by all populators.
///
/// Every setting can also come from a `--config` YAML file; flags given on
/// the command line win.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonPopulateArgs {
    /// Table to fill with synthetic rows
    pub table: Option<String>,

    /// Path to a YAML run-config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of rows to insert [default: 10000]
    #[arg(long, short = 't')]
    pub total: Option<u64>,

    /// Rows per INSERT statement [default: 1000]
    #[arg(long, short = 's')]
    pub step: Option<u64>,

    /// Columns whose generated values must not repeat (comma-separated)
    #[arg(long, short = 'u', value_delimiter = ',')]
    pub uniqs: Vec<String>,

    /// Columns to leave to the database default (comma-separated)
    #[arg(long, short = 'n', value_delimiter = ',')]
    pub nulls: Vec<String>,

    /// Sample a column from another table's values: `column=table.column` (repeatable)
    #[arg(long = "ref", short = 'r', value_name = "COLUMN=TABLE.COLUMN")]
    pub refs: Vec<ReferenceArg>,

    /// Give up on a unique column after this many retries (default: retry forever)
    #[arg(long)]
    pub max_unique_retries: Option<u64>,

    /// Random seed for reproducible data (default: random)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after each committed chunk, e.g. `50ms`, `1s` [default: 50ms]
    #[arg(long, value_parser = parse_duration)]
    pub pause: Option<Duration>,

    /// Introspect the table and print the column plan without inserting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPopulateArgs {
    /// Merge the flags over an optional run config into run options.
    pub fn into_options(self, config: RunConfig) -> Result<PopulateOptions, ConfigError> {
        let table = self.table.or(config.table).ok_or(ConfigError::MissingTable)?;

        let pause = match (self.pause, config.pause) {
            (Some(pause), _) => Some(pause),
            (None, Some(raw)) => Some(parse_duration(&raw)?),
            (None, None) => None,
        };

        let mut options = PopulateOptions::new(table)
            .with_max_unique_retries(self.max_unique_retries.or(config.max_unique_retries))
            .with_seed(self.seed.or(config.seed));

        if let Some(total) = self.total.or(config.total) {
            options = options.with_total(total);
        }
        if let Some(step) = self.step.or(config.step) {
            options = options.with_step(step);
        }
        if let Some(pause) = pause {
            options = options.with_pause(pause);
        }

        options.uniqs = if self.uniqs.is_empty() { config.uniqs } else { self.uniqs };
        options.nulls = if self.nulls.is_empty() { config.nulls } else { self.nulls };

        options.refs = config.refs;
        for reference in self.refs {
            options.refs.insert(reference.column, reference.spec);
        }

        options.validate()?;
        Ok(options)
    }
}

/// A `column=table.column` reference given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceArg {
    pub column: String,
    pub spec: ReferenceSpec,
}

impl FromStr for ReferenceArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, target) = s
            .split_once('=')
            .ok_or_else(|| format!("expected column=table.column, got '{s}'"))?;

        let column = column.trim();
        if column.is_empty() {
            return Err(format!("missing column name in '{s}'"));
        }

        let spec = ReferenceSpec::Dotted(target.trim().to_string());
        spec.normalize(column).map_err(|e| e.to_string())?;

        Ok(Self {
            column: column.to_string(),
            spec,
        })
    }
}

/// Parse a pause like "50ms", "1s", "2m" or a plain number of milliseconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    // "ms" must be checked before "s" and "m"
    if let Some(num) = s.strip_suffix("ms") {
        return num.trim().parse().map(Duration::from_millis).map_err(|_| invalid());
    }
    if let Some(num) = s.strip_suffix('s') {
        return num.trim().parse().map(Duration::from_secs).map_err(|_| invalid());
    }
    if let Some(num) = s.strip_suffix('m') {
        let minutes: u64 = num.trim().parse().map_err(|_| invalid())?;
        return minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(invalid);
    }

    // No suffix - treat as milliseconds
    s.parse().map(Duration::from_millis).map_err(|_| invalid())
}
