//! End-to-end populate runs against an in-memory database.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use okoshi_core::{quote, ColumnMetadata, ColumnPlan, ReferenceTarget, SqlLiteral};
use okoshi_generator::{GenerateError, GenerationClock, OverrideRegistry, TableOverrides};
use okoshi_populate::{
    PopulateError, PopulateOptions, Populator, ProgressReporter, ReferenceSource, SchemaSource,
    SourceError, StatementExecutor,
};
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
struct MemoryDatabase {
    tables: HashMap<String, Vec<ColumnMetadata>>,
    values: HashMap<(String, String), Vec<SqlLiteral>>,
    executed: Vec<String>,
    fail_on_statement: Option<usize>,
}

impl MemoryDatabase {
    fn with_table(mut self, table: &str, columns: Vec<ColumnMetadata>) -> Self {
        self.tables.insert(table.to_string(), columns);
        self
    }

    fn with_values(mut self, table: &str, column: &str, values: Vec<SqlLiteral>) -> Self {
        self.values
            .insert((table.to_string(), column.to_string()), values);
        self
    }
}

#[async_trait]
impl SchemaSource for MemoryDatabase {
    async fn table_exists(&mut self, table: &str) -> Result<bool, SourceError> {
        Ok(self.tables.contains_key(table))
    }

    async fn columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>, SourceError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| format!("no table {table}").into())
    }
}

#[async_trait]
impl ReferenceSource for MemoryDatabase {
    async fn distinct_values(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Vec<SqlLiteral>, SourceError> {
        Ok(self
            .values
            .get(&(table.to_string(), column.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl StatementExecutor for MemoryDatabase {
    async fn execute_in_transaction(&mut self, statement: &str) -> Result<(), SourceError> {
        if self.fail_on_statement == Some(self.executed.len()) {
            return Err("deadlock found when trying to get lock".into());
        }
        self.executed.push(statement.to_string());
        Ok(())
    }
}

fn widgets_db() -> MemoryDatabase {
    MemoryDatabase::default()
        .with_table(
            "widgets",
            vec![
                ColumnMetadata::new("id", "int(11)").auto_increment(),
                ColumnMetadata::new("code", "varchar(6)"),
                ColumnMetadata::new("owner_id", "int(11)"),
                ColumnMetadata::new("created_at", "datetime"),
                ColumnMetadata::new("label", "varchar(64)").virtual_column(),
            ],
        )
        .with_table("owners", vec![ColumnMetadata::new("id", "int(11)").auto_increment()])
        .with_values(
            "owners",
            "id",
            vec![
                SqlLiteral::Integer(3),
                SqlLiteral::Integer(14),
                SqlLiteral::Integer(159),
            ],
        )
}

fn widgets_options() -> PopulateOptions {
    PopulateOptions::new("widgets")
        .with_total(10)
        .with_step(5)
        .with_unique("code")
        .with_reference("owner_id", ReferenceTarget::new("owners", "id"))
        .with_seed(Some(42))
        .with_pause(Duration::ZERO)
}

fn clock() -> GenerationClock {
    GenerationClock::fixed(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

const WIDGETS_PREFIX: &str = "INSERT INTO widgets(code, owner_id, created_at) VALUES ";

/// Split the VALUES part of a generated statement into tuples of literals.
fn tuples(statement: &str, prefix: &str) -> Vec<Vec<String>> {
    let values = statement
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("unexpected statement: {statement}"));
    values
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split("),(")
        .map(|tuple| tuple.split(", ").map(String::from).collect())
        .collect()
}

#[tokio::test]
async fn test_widgets_end_to_end() {
    let mut populator = Populator::new(widgets_db(), widgets_options()).with_clock(clock());
    let mut progress = ProgressReporter::new(Vec::new());

    let metrics = populator.populate(&mut progress).await.unwrap();
    assert_eq!(metrics.rows_inserted, 10);
    assert_eq!(metrics.batch_count, 2);

    let db = populator.into_inner();
    assert_eq!(db.executed.len(), 2);

    let owners: HashSet<&str> = ["3", "14", "159"].into_iter().collect();
    let mut codes = HashSet::new();

    for statement in &db.executed {
        assert!(!statement.contains("label"));

        let rows = tuples(statement, WIDGETS_PREFIX);
        assert_eq!(rows.len(), 5);
        for row in rows {
            assert_eq!(row.len(), 3);
            assert!(codes.insert(row[0].clone()), "duplicate code {}", row[0]);
            // varchar(6) -> 5 hex characters, quoted
            assert_eq!(row[0].len(), 7);
            assert!(owners.contains(row[1].as_str()), "{} not an owner", row[1]);
            assert!(row[2].starts_with('\'') && row[2].len() == 21);
        }
    }
    assert_eq!(codes.len(), 10);

    let output = String::from_utf8(progress.into_inner()).unwrap();
    assert!(output.contains("\r5"));
    assert!(output.contains("\r10"));
    assert!(output.ends_with('\n'));
}

#[tokio::test]
async fn test_chunks_follow_partition() {
    let options = widgets_options().with_total(125).with_step(20);
    let mut populator = Populator::new(widgets_db(), options).with_clock(clock());
    let mut progress = ProgressReporter::new(Vec::new());

    let metrics = populator.populate(&mut progress).await.unwrap();
    assert_eq!(metrics.rows_inserted, 125);

    let sizes: Vec<usize> = populator
        .into_inner()
        .executed
        .iter()
        .map(|s| tuples(s, WIDGETS_PREFIX).len())
        .collect();
    assert_eq!(sizes, vec![20, 20, 20, 20, 20, 20, 5]);
}

#[tokio::test]
async fn test_missing_table_fails_before_generation() {
    let mut populator = Populator::new(widgets_db(), PopulateOptions::new("gadgets"));
    let mut progress = ProgressReporter::new(Vec::new());

    let err = populator.populate(&mut progress).await.unwrap_err();
    assert!(matches!(err, PopulateError::TableNotFound(ref t) if t == "gadgets"));
    assert!(populator.into_inner().executed.is_empty());
}

#[tokio::test]
async fn test_empty_reference_pool_fails_before_generation() {
    let db = widgets_db().with_values("owners", "id", Vec::new());
    let mut populator = Populator::new(db, widgets_options());
    let mut progress = ProgressReporter::new(Vec::new());

    let err = populator.populate(&mut progress).await.unwrap_err();
    match err {
        PopulateError::Generate(GenerateError::ReferencePoolEmpty { column, target }) => {
            assert_eq!(column, "owner_id");
            assert_eq!(target, ReferenceTarget::new("owners", "id"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(populator.into_inner().executed.is_empty());
}

#[tokio::test]
async fn test_failed_chunk_keeps_earlier_chunks() {
    let mut db = widgets_db();
    db.fail_on_statement = Some(1);

    let mut populator = Populator::new(db, widgets_options());
    let mut progress = ProgressReporter::new(Vec::new());

    let err = populator.populate(&mut progress).await.unwrap_err();
    assert!(matches!(
        err,
        PopulateError::Execution {
            chunk: 2,
            rows_committed: 5,
            ..
        }
    ));
    assert_eq!(progress.total_committed(), 5);
    assert_eq!(populator.into_inner().executed.len(), 1);
}

#[tokio::test]
async fn test_existing_unique_values_are_avoided() {
    let db = MemoryDatabase::default()
        .with_table("flags", vec![ColumnMetadata::new("on", "tinyint(1)")])
        .with_values("flags", "on", vec![SqlLiteral::Integer(0)]);
    let options = PopulateOptions::new("flags")
        .with_total(1)
        .with_step(1)
        .with_unique("on")
        .with_seed(Some(1))
        .with_pause(Duration::ZERO);

    let mut populator = Populator::new(db, options);
    let mut progress = ProgressReporter::new(Vec::new());
    populator.populate(&mut progress).await.unwrap();

    assert_eq!(
        populator.into_inner().executed,
        vec!["INSERT INTO flags(on) VALUES (1)".to_string()]
    );
}

#[tokio::test]
async fn test_bounded_retries_abort_when_value_space_runs_out() {
    let db = MemoryDatabase::default()
        .with_table("flags", vec![ColumnMetadata::new("on", "tinyint(1)")]);
    let options = PopulateOptions::new("flags")
        .with_total(3)
        .with_step(1)
        .with_unique("on")
        .with_max_unique_retries(Some(100))
        .with_seed(Some(1))
        .with_pause(Duration::ZERO);

    let mut populator = Populator::new(db, options);
    let mut progress = ProgressReporter::new(Vec::new());
    let err = populator.populate(&mut progress).await.unwrap_err();

    assert!(matches!(
        err,
        PopulateError::Generate(GenerateError::UniquenessExhausted { attempts: 100, .. })
    ));
    assert!(progress.total_retries() >= 100);
    assert_eq!(populator.into_inner().executed.len(), 2);
}

#[tokio::test]
async fn test_overrides_take_precedence() {
    let mut registry = OverrideRegistry::new();
    registry.register(
        "widgets",
        TableOverrides::new().with("code", |_: &mut StdRng, plan: &ColumnPlan| {
            quote(&format!("{}'x", plan.name))
        }),
    );

    let options = widgets_options().with_total(2).with_step(2);
    let mut populator = Populator::new(widgets_db(), options).with_overrides(registry);
    let mut progress = ProgressReporter::new(Vec::new());
    populator.populate(&mut progress).await.unwrap();

    let db = populator.into_inner();
    for row in tuples(&db.executed[0], WIDGETS_PREFIX) {
        assert_eq!(row[0], "'code\\'x'");
    }
}

#[tokio::test]
async fn test_column_plans_for_dry_run() {
    let mut populator = Populator::new(widgets_db(), widgets_options().with_null("created_at"));

    let plans = populator.column_plans().await.unwrap();
    let names: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["code", "owner_id"]);
    assert!(populator.into_inner().executed.is_empty());
}
