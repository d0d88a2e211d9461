//! `mysql_async` implementation of the populate collaborator traits.

use crate::error::MySQLPopulatorError;
use async_trait::async_trait;
use mysql_async::{prelude::*, Opts, Pool, TxOpts, Value};
use okoshi_core::{ColumnMetadata, SqlLiteral};
use okoshi_populate::{ReferenceSource, SchemaSource, SourceError, StatementExecutor};
use tracing::{debug, trace};

const TABLE_EXISTS_QUERY: &str = "
    SELECT COUNT(*)
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = DATABASE()
    AND TABLE_NAME = ?";

const COLUMNS_QUERY: &str = "
    SELECT COLUMN_NAME, COLUMN_TYPE, EXTRA
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE()
    AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION";

/// A MySQL database reached through a connection pool.
pub struct MySqlDatabase {
    pool: Pool,
}

impl MySqlDatabase {
    /// Connect and check the server answers.
    pub async fn connect(connection_string: &str) -> Result<Self, MySQLPopulatorError> {
        Self::connect_with(Opts::from_url(connection_string)?).await
    }

    /// Connect with prebuilt options.
    pub async fn connect_with(opts: Opts) -> Result<Self, MySQLPopulatorError> {
        let pool = Pool::new(opts);

        let mut conn = pool.get_conn().await?;
        conn.query_drop("SELECT 1").await?;
        drop(conn);

        Ok(Self { pool })
    }

    /// Create from an existing pool.
    pub fn with_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<(), MySQLPopulatorError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl SchemaSource for MySqlDatabase {
    async fn table_exists(&mut self, table: &str) -> Result<bool, SourceError> {
        let mut conn = self.pool.get_conn().await?;
        let count: Option<u64> = conn.exec_first(TABLE_EXISTS_QUERY, (table,)).await?;
        Ok(count.unwrap_or(0) > 0)
    }

    async fn columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>, SourceError> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<(String, String, String)> = conn.exec(COLUMNS_QUERY, (table,)).await?;

        Ok(rows
            .into_iter()
            .map(|(name, column_type, extra)| column_metadata(name, column_type, &extra))
            .collect())
    }
}

#[async_trait]
impl ReferenceSource for MySqlDatabase {
    async fn distinct_values(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Vec<SqlLiteral>, SourceError> {
        let sql = format!(
            "SELECT DISTINCT {} FROM {}",
            quote_identifier(column),
            quote_identifier(table)
        );
        debug!("{}", sql);

        let mut conn = self.pool.get_conn().await?;
        let values: Vec<Value> = conn.query(sql).await?;

        Ok(values.into_iter().map(value_to_literal).collect())
    }
}

#[async_trait]
impl StatementExecutor for MySqlDatabase {
    async fn execute_in_transaction(&mut self, statement: &str) -> Result<(), SourceError> {
        let mut conn = self.pool.get_conn().await?;
        let mut tx = conn.start_transaction(TxOpts::default()).await?;
        trace!("Executing {} byte statement", statement.len());
        tx.query_drop(statement).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Build column metadata from one `information_schema.COLUMNS` row.
///
/// `EXTRA` holds `auto_increment` for auto-increment columns and
/// `VIRTUAL GENERATED` / `STORED GENERATED` for computed ones.
/// `DEFAULT_GENERATED` only marks an expression default and is fillable.
pub fn column_metadata(name: String, column_type: String, extra: &str) -> ColumnMetadata {
    let extra = extra.to_uppercase();
    ColumnMetadata {
        name,
        sql_type: column_type,
        auto_increment: extra.contains("AUTO_INCREMENT"),
        virtual_column: extra.contains("VIRTUAL GENERATED") || extra.contains("STORED GENERATED"),
    }
}

/// Convert a raw MySQL value to a literal.
pub fn value_to_literal(value: Value) -> SqlLiteral {
    match value {
        Value::NULL => SqlLiteral::Null,
        Value::Int(v) => SqlLiteral::Integer(v),
        Value::UInt(v) => match i64::try_from(v) {
            Ok(v) => SqlLiteral::Integer(v),
            Err(_) => SqlLiteral::Text(v.to_string()),
        },
        Value::Float(v) => SqlLiteral::Float(f64::from(v)),
        Value::Double(v) => SqlLiteral::Float(v),
        Value::Bytes(bytes) => SqlLiteral::from_bytes(bytes),
        Value::Date(year, month, day, hour, minute, second, _micros) => SqlLiteral::Text(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        )),
        Value::Time(negative, days, hours, minutes, seconds, _micros) => {
            let sign = if negative { "-" } else { "" };
            let hours = u32::from(hours) + days * 24;
            SqlLiteral::Text(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}"))
        }
    }
}

/// Backtick-quote an identifier.
pub fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}
