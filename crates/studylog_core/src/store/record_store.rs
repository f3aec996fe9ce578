//! Record store contract.
//!
//! # Responsibility
//! - Define the three remote operations the view-model depends on.
//! - Define the error type shared by every store implementation.
//!
//! # Invariants
//! - `insert` assigns the id store-side and returns the created row.
//! - `delete_by_id` reports `NotFound` when no row matched.
//! - Read paths reject invalid stored rows instead of masking them.

use crate::db::DbError;
use crate::model::record::{NewRecord, Record, RecordId, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store round-trip.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    Db(DbError),
    Http(reqwest::Error),
    /// Remote endpoint answered with a non-success status.
    Status { status: u16, body: String },
    NotFound(RecordId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "remote store returned status {status}: {body}")
            }
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Http(err) => Some(err),
            Self::Status { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Table-backed persistence for study records.
pub trait RecordStore {
    /// Returns every stored record, in store order.
    fn select_all(&self) -> StoreResult<Vec<Record>>;
    /// Inserts one record and returns it with its assigned id.
    fn insert(&self, record: &NewRecord) -> StoreResult<Record>;
    /// Deletes the record with `id`.
    fn delete_by_id(&self, id: RecordId) -> StoreResult<()>;
    /// Short backend label for diagnostics.
    fn backend_name(&self) -> &'static str;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn select_all(&self) -> StoreResult<Vec<Record>> {
        (**self).select_all()
    }

    fn insert(&self, record: &NewRecord) -> StoreResult<Record> {
        (**self).insert(record)
    }

    fn delete_by_id(&self, id: RecordId) -> StoreResult<()> {
        (**self).delete_by_id(id)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
