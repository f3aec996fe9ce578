//! Study log domain model.
//!
//! # Responsibility
//! - Define the record shape shared by stores and the view-model.
//! - Define transient form input state.
//!
//! # Invariants
//! - Records are identified by a store-assigned `RecordId`.
//! - Records are never edited in place; lists are replaced wholesale.

pub mod form;
pub mod record;
