//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into screen-level state.
//! - Keep front ends decoupled from storage details.

pub mod view_model;
