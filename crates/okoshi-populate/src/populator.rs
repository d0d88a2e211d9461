//! The populate run loop.

use crate::batch::{chunk_sizes, BatchInsertBuilder};
use crate::error::PopulateError;
use crate::options::PopulateOptions;
use crate::plan::build_column_plans;
use crate::progress::ProgressReporter;
use crate::source::TargetDatabase;
use okoshi_core::{ColumnPlan, Strategy};
use okoshi_generator::{
    GenerationClock, OverrideRegistry, ReferencePool, ReferenceSampler, RowSynthesizer,
    UniquenessTracker,
};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows inserted.
    pub rows_inserted: u64,
    /// Number of INSERT statements executed.
    pub batch_count: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent synthesizing rows and building statements.
    pub generation_duration: Duration,
    /// Time spent executing statements.
    pub insert_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Fills one table with synthetic rows.
///
/// Setup (introspection, plan building, loading uniqueness seeds and
/// reference pools) happens before the first row is generated. Chunks are
/// then synthesized and executed strictly one after another.
pub struct Populator<D> {
    db: D,
    options: PopulateOptions,
    overrides: OverrideRegistry,
    clock: Option<GenerationClock>,
}

impl<D: TargetDatabase> Populator<D> {
    pub fn new(db: D, options: PopulateOptions) -> Self {
        Self {
            db,
            options,
            overrides: OverrideRegistry::new(),
            clock: None,
        }
    }

    /// Use per-table override generators.
    pub fn with_overrides(mut self, overrides: OverrideRegistry) -> Self {
        self.overrides = overrides;
        self
    }

    /// Pin the "now" used by date and datetime generators.
    pub fn with_clock(mut self, clock: GenerationClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn options(&self) -> &PopulateOptions {
        &self.options
    }

    /// Give back the database handle.
    pub fn into_inner(self) -> D {
        self.db
    }

    /// Check the table exists and build its column plan.
    pub async fn column_plans(&mut self) -> Result<Vec<ColumnPlan>, PopulateError> {
        let table = self.options.table.clone();
        self.options.validate()?;

        let exists = self
            .db
            .table_exists(&table)
            .await
            .map_err(|e| PopulateError::schema(format!("checking table '{table}'"), e))?;
        if !exists {
            return Err(PopulateError::TableNotFound(table));
        }

        let columns = self
            .db
            .columns(&table)
            .await
            .map_err(|e| PopulateError::schema(format!("reading columns of '{table}'"), e))?;

        let refs = self.options.reference_targets()?;
        let overrides = self.overrides.for_table(&table);

        let plans = build_column_plans(
            &table,
            &columns,
            &self.options.uniqs,
            &self.options.nulls,
            &refs,
            overrides.as_deref(),
        )?;

        for plan in &plans {
            debug!("Column '{}' ({}): {}", plan.name, plan.sql_type, plan.strategy);
        }

        Ok(plans)
    }

    /// Run all setup and return a synthesizer ready for the first chunk.
    pub async fn prepare(&mut self) -> Result<RowSynthesizer, PopulateError> {
        let plans = self.column_plans().await?;
        let table = self.options.table.clone();

        let mut uniques = UniquenessTracker::new().with_max_retries(self.options.max_unique_retries);
        let mut references = ReferenceSampler::new();

        for plan in &plans {
            match &plan.strategy {
                Strategy::Unique(logical_type) => {
                    let existing = self
                        .db
                        .distinct_values(&table, &plan.name)
                        .await
                        .map_err(|e| {
                            PopulateError::schema(
                                format!("reading existing values of '{table}.{}'", plan.name),
                                e,
                            )
                        })?;
                    debug!(
                        "Unique column '{}' starts with {} existing values",
                        plan.name,
                        existing.len()
                    );
                    uniques.seed(
                        &plan.name,
                        existing.iter().map(|v| logical_type.render_existing(v)),
                    );
                }
                Strategy::Reference(target) => {
                    let values = self
                        .db
                        .distinct_values(&target.table, &target.column)
                        .await
                        .map_err(|e| {
                            PopulateError::schema(format!("reading reference values of '{target}'"), e)
                        })?;
                    debug!(
                        "Reference column '{}' samples from {} values of '{}'",
                        plan.name,
                        values.len(),
                        target
                    );
                    references.insert(plan.name.clone(), ReferencePool::new(target.clone(), values));
                }
                Strategy::Override | Strategy::Literal(_) => {}
            }
        }

        if self.options.total > 0 {
            references.ensure_populated()?;
        }

        let synthesizer = RowSynthesizer::new(plans, self.options.seed)
            .with_overrides(self.overrides.for_table(&table))
            .with_uniques(uniques)
            .with_references(references)
            .with_clock(self.clock.unwrap_or_default());

        Ok(synthesizer)
    }

    /// Insert `total` rows in chunks of `step`, reporting progress after each
    /// committed chunk.
    ///
    /// The first failing chunk aborts the run; chunks committed before it
    /// stay in the table.
    pub async fn populate<W: Write>(
        &mut self,
        progress: &mut ProgressReporter<W>,
    ) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        let mut synthesizer = self.prepare().await?;
        let builder = BatchInsertBuilder::new(&self.options.table, &synthesizer.column_names());
        let chunks = chunk_sizes(self.options.total, self.options.step)?;

        info!(
            "Populating table '{}' with {} rows ({} chunks of up to {})",
            self.options.table,
            self.options.total,
            chunks.len(),
            self.options.step
        );

        let mut generation_time = Duration::ZERO;
        let mut insert_time = Duration::ZERO;

        for (index, size) in chunks.enumerate() {
            let chunk = index as u64 + 1;

            let gen_start = Instant::now();
            let statement = builder.build_chunk(&mut synthesizer, size, progress)?;
            generation_time += gen_start.elapsed();

            let insert_start = Instant::now();
            self.db
                .execute_in_transaction(&statement)
                .await
                .map_err(|source| PopulateError::Execution {
                    chunk,
                    rows_committed: metrics.rows_inserted,
                    source,
                })?;
            insert_time += insert_start.elapsed();
            drop(statement);

            metrics.rows_inserted += size;
            metrics.batch_count += 1;
            progress.committed(size)?;

            debug!(
                "Chunk {} committed: {} rows, {} total",
                chunk, size, metrics.rows_inserted
            );

            if !self.options.pause.is_zero() {
                tokio::time::sleep(self.options.pause).await;
            }
        }

        progress.finish()?;

        metrics.total_duration = start_time.elapsed();
        metrics.generation_duration = generation_time;
        metrics.insert_duration = insert_time;

        info!(
            "Population complete: {} rows in {} chunks, {:?} ({:.2} rows/sec)",
            metrics.rows_inserted,
            metrics.batch_count,
            metrics.total_duration,
            metrics.rows_per_second()
        );

        Ok(metrics)
    }
}
