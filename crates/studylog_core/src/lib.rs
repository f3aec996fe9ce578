//! Core logic for the study log tracker.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, RestConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::form::{parse_hours_input, FormState};
pub use model::record::{
    total_hours, validate, NewRecord, Record, RecordId, RecordValidationError,
};
pub use service::view_model::{
    LoadPhase, MutationOutcome, ReconcilePolicy, RecordListViewModel, ViewModelError,
};
pub use store::record_store::{RecordStore, StoreError, StoreResult};
pub use store::rest_store::RestRecordStore;
pub use store::sqlite_store::SqliteRecordStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
