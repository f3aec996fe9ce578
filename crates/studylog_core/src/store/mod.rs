//! Record store abstractions and implementations.
//!
//! # Responsibility
//! - Define the select/insert/delete contract consumed by the view-model.
//! - Keep SQL and HTTP details out of view-model orchestration.

pub mod record_store;
pub mod rest_store;
pub mod sqlite_store;
