//! Record store selection.
//!
//! # Responsibility
//! - Describe which backend a front end wants (local SQLite or hosted table).
//! - Validate settings and open the matching `RecordStore`.
//!
//! # Invariants
//! - A store is only opened from a configuration that passed `validate()`.

use crate::db::open_db;
use crate::store::record_store::{RecordStore, StoreError};
use crate::store::rest_store::RestRecordStore;
use crate::store::sqlite_store::SqliteRecordStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Table name used by the hosted backend.
pub const DEFAULT_REMOTE_TABLE: &str = "study-record";
/// SQLite file used when no path is given.
pub const DEFAULT_DB_FILE_NAME: &str = "studylog.sqlite3";

/// Hosted table connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project URL, for example `https://xyz.example.co`.
    pub base_url: String,
    /// Public API key sent as `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite { path: PathBuf },
    Rest(RestConfig),
}

#[derive(Debug)]
pub enum ConfigError {
    /// A required setting is empty.
    Missing(&'static str),
    /// URL is not `http://` or `https://`.
    InvalidUrl(String),
    /// The store could not be opened.
    Open(StoreError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "`{field}` cannot be empty"),
            Self::InvalidUrl(url) => {
                write!(f, "remote url must start with http:// or https://, got `{url}`")
            }
            Self::Open(err) => write!(f, "failed to open record store: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            _ => None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

impl StoreConfig {
    /// Checks that every required setting is present and well-formed.
    ///
    /// # Errors
    /// - `Missing` when a path, url, key or table is blank.
    /// - `InvalidUrl` when the url scheme is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Sqlite { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Missing("db path"));
                }
            }
            Self::Rest(rest) => {
                let url = rest.base_url.trim();
                if url.is_empty() {
                    return Err(ConfigError::Missing("remote url"));
                }
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl(url.to_string()));
                }
                if rest.api_key.trim().is_empty() {
                    return Err(ConfigError::Missing("api key"));
                }
                if rest.table.trim().is_empty() {
                    return Err(ConfigError::Missing("table"));
                }
            }
        }
        Ok(())
    }

    /// Validates and opens the configured store.
    pub fn open_store(&self) -> Result<Box<dyn RecordStore>, ConfigError> {
        self.validate()?;
        let store: Box<dyn RecordStore> = match self {
            Self::Sqlite { path } => {
                let conn = open_db(path).map_err(|err| ConfigError::Open(err.into()))?;
                Box::new(SqliteRecordStore::new(conn))
            }
            Self::Rest(rest) => Box::new(RestRecordStore::new(rest).map_err(ConfigError::Open)?),
        };
        info!(
            "event=store_open module=config status=ok backend={}",
            store.backend_name()
        );
        Ok(store)
    }
}
