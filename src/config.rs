//! Connection configuration.

pub mod database;
mod template;

pub use database::{ConnectionSettings, DatabaseConfig, DatabaseConfigError};
