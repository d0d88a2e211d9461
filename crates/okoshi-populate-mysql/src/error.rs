//! Error types for the MySQL populator.

use thiserror::Error;

/// Errors that can occur while connecting to MySQL.
#[derive(Error, Debug)]
pub enum MySQLPopulatorError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// The connection string could not be parsed.
    #[error("Invalid MySQL connection string: {0}")]
    Url(#[from] mysql_async::UrlError),
}
