//! MySQL backend for okoshi.
//!
//! [`MySqlDatabase`] implements the populate collaborator traits on top of a
//! `mysql_async` connection pool: introspection through
//! `information_schema.COLUMNS`, `SELECT DISTINCT` lookups for reference and
//! uniqueness seeds, and one transaction per INSERT chunk.

pub mod args;
pub mod database;
pub mod error;

pub use args::MySQLPopulateArgs;
pub use database::MySqlDatabase;
pub use error::MySQLPopulatorError;
