//! Rails-style `database.yml` support.
//!
//! ```yaml
//! default: &default
//!   adapter: mysql2
//!   username: root
//!   host: 127.0.0.1
//!
//! development:
//!   primary:
//!     <<: *default
//!     database: app_development
//! ```
//!
//! Connections are looked up by key path, `development,primary` by default.
//! Credentials may come from the environment through `<%= ENV['NAME'] %>` and
//! `<%= ENV.fetch("NAME") { "default" } %>` tags, which are expanded before
//! the YAML is parsed.

use mysql_async::{Opts, OptsBuilder};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Locations searched when no config path is given.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["config/database.yml", "../config/database.yml"];

const MYSQL_ADAPTERS: &[&str] = &["mysql", "mysql2", "trilogy"];

/// Errors loading or resolving a database config.
#[derive(Debug, Error)]
pub enum DatabaseConfigError {
    #[error("Failed to read database config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse database config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No database config found (looked in {0})")]
    NotFound(String),

    #[error("No connection at '{0}' in database config")]
    MissingEntry(String),

    #[error("Adapter '{0}' is not a MySQL adapter")]
    UnsupportedAdapter(String),

    #[error("Invalid connection url: {0}")]
    Url(#[from] mysql_async::UrlError),

    #[error("Unsupported template tag in database config: {0}")]
    UnsupportedTemplate(String),

    #[error("Environment variable '{0}' is not set and has no default")]
    MissingEnv(String),
}

/// One connection entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub adapter: Option<String>,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectionSettings {
    /// Build `mysql_async` options for this entry.
    pub fn to_mysql_opts(&self) -> Result<Opts, DatabaseConfigError> {
        if let Some(adapter) = &self.adapter {
            if !MYSQL_ADAPTERS.contains(&adapter.as_str()) {
                return Err(DatabaseConfigError::UnsupportedAdapter(adapter.clone()));
            }
        }

        if let Some(url) = &self.url {
            return Ok(Opts::from_url(url)?);
        }

        let builder = OptsBuilder::default()
            .ip_or_hostname(self.host.clone().unwrap_or_else(|| "localhost".to_string()))
            .tcp_port(self.port.unwrap_or(3306))
            .socket(self.socket.clone())
            .user(self.username.clone())
            .pass(self.password.clone())
            .db_name(self.database.clone());

        Ok(builder.into())
    }

    /// A loggable description without the password.
    pub fn describe(&self) -> String {
        if let Some(url) = &self.url {
            return crate::populate::mask_connection_password(url);
        }
        format!(
            "mysql://{}@{}:{}/{}",
            self.username.as_deref().unwrap_or(""),
            self.host.as_deref().unwrap_or("localhost"),
            self.port.unwrap_or(3306),
            self.database.as_deref().unwrap_or("")
        )
    }
}

/// A parsed `database.yml`, with `<<` merge keys applied.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    root: Value,
}

impl DatabaseConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, DatabaseConfigError> {
        let yaml = super::template::render(yaml, |name| std::env::var(name).ok())?;
        let mut root: Value = serde_yaml::from_str(&yaml)?;
        root.apply_merge()?;
        Ok(Self { root })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatabaseConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatabaseConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the first config found in [`DEFAULT_CONFIG_PATHS`].
    pub fn discover() -> Result<Self, DatabaseConfigError> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .map(|p| Self::from_file(p))
            .unwrap_or_else(|| Err(DatabaseConfigError::NotFound(DEFAULT_CONFIG_PATHS.join(", "))))
    }

    /// Resolve the connection at `path` (e.g. `["development", "primary"]`).
    ///
    /// Single-database configs have no `primary` level; when the last key is
    /// missing but its parent already is a connection entry, the parent is used.
    pub fn connection<S: AsRef<str>>(&self, path: &[S]) -> Result<ConnectionSettings, DatabaseConfigError> {
        let joined = path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".");
        let missing = || DatabaseConfigError::MissingEntry(joined.clone());

        let mut node = &self.root;
        for (i, key) in path.iter().enumerate() {
            match node.get(key.as_ref()) {
                Some(next) => node = next,
                None if i + 1 == path.len() && i > 0 && is_connection(node) => {
                    tracing::debug!("Using '{}' as a single-database entry", joined);
                    break;
                }
                None => return Err(missing()),
            }
        }

        if !node.is_mapping() {
            return Err(missing());
        }
        Ok(serde_yaml::from_value(node.clone())?)
    }
}

fn is_connection(node: &Value) -> bool {
    ["adapter", "database", "url", "host"]
        .iter()
        .any(|key| node.get(key).is_some())
}
