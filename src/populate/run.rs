//! Populate command runner.

use anyhow::Context;
use okoshi_populate::{Populator, ProgressReporter, RunConfig};
use okoshi_populate_mysql::{MySQLPopulateArgs, MySqlDatabase};

use super::mask_connection_password;
use crate::config::DatabaseConfig;
use crate::PopulateSource;

/// Run the populate command: fill one table with synthetic rows.
pub async fn run_populate(source: PopulateSource) -> anyhow::Result<()> {
    match source {
        PopulateSource::MySQL { args } => run_mysql(args).await,
    }
}

async fn run_mysql(args: MySQLPopulateArgs) -> anyhow::Result<()> {
    let run_config = match &args.common.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load run config from {path:?}"))?,
        None => RunConfig::default(),
    };

    let dry_run = args.common.dry_run;
    let options = args
        .common
        .clone()
        .into_options(run_config)
        .context("Invalid populate options")?;

    let db = connect_mysql(&args).await?;
    let table = options.table.clone();
    let mut populator = Populator::new(db, options).with_overrides(crate::overrides::registry());

    if dry_run {
        let plans = populator
            .column_plans()
            .await
            .with_context(|| format!("Failed to plan table '{table}'"))?;

        let options = populator.options();
        tracing::info!(
            "[DRY-RUN] Would insert {} rows into '{}' in chunks of {}",
            options.total,
            table,
            options.step
        );
        for plan in &plans {
            tracing::info!(
                "[DRY-RUN]   {} {} (limit {}): {}",
                plan.name,
                plan.sql_type,
                plan.limit,
                plan.strategy
            );
        }
        return populator
            .into_inner()
            .disconnect()
            .await
            .context("Failed to disconnect from MySQL");
    }

    let mut progress = ProgressReporter::stderr();
    let metrics = populator
        .populate(&mut progress)
        .await
        .with_context(|| format!("Failed to populate table '{table}'"))?;

    tracing::info!(
        "Populated {}: {} rows in {:?}",
        table,
        metrics.rows_inserted,
        metrics.total_duration
    );

    populator
        .into_inner()
        .disconnect()
        .await
        .context("Failed to disconnect from MySQL")
}

async fn connect_mysql(args: &MySQLPopulateArgs) -> anyhow::Result<MySqlDatabase> {
    if let Some(conn_str) = &args.mysql_connection_string {
        tracing::info!("Connecting to {}", mask_connection_password(conn_str));
        return MySqlDatabase::connect(conn_str)
            .await
            .context("Failed to connect to MySQL");
    }

    let config = match &args.database_config {
        Some(path) => DatabaseConfig::from_file(path)?,
        None => DatabaseConfig::discover()
            .context("No --mysql-connection-string given and no database config found")?,
    };
    let settings = config
        .connection(&args.db)
        .with_context(|| format!("Failed to resolve database '{}'", args.db.join(".")))?;

    tracing::info!("Connecting to {}", settings.describe());
    MySqlDatabase::connect_with(settings.to_mysql_opts()?)
        .await
        .context("Failed to connect to MySQL")
}
