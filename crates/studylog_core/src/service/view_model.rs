//! Record list view-model.
//!
//! # Responsibility
//! - Own the authoritative in-memory record list and the add-record form.
//! - Orchestrate select/insert/delete against an injected `RecordStore`.
//! - Surface validation and store failures as inline messages and `Err`s.
//!
//! # Invariants
//! - The list is only ever replaced wholesale, never edited in place.
//! - Every list held here has unique ids and valid records.
//! - A failed round-trip leaves the list as last known good.
//! - Form inputs are cleared only after a successful insert.

use crate::model::form::{parse_hours_input, FormState};
use crate::model::record::{
    find_duplicate_id, total_hours, validate, NewRecord, Record, RecordId,
    RecordValidationError,
};
use crate::store::record_store::{RecordStore, StoreError, StoreResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const VALIDATION_FAILED_MESSAGE: &str =
    "title and a non-negative number of hours are required";
pub const SAVE_FAILED_MESSAGE: &str = "failed to save record";
pub const DELETE_FAILED_MESSAGE: &str = "failed to delete record";
pub const LOAD_FAILED_MESSAGE: &str = "failed to load records";

/// Loading state exposed to the front end.
///
/// `Loading` happens once, before the first fetch completes. Later fetches
/// report `Refreshing` so callers can decide whether to show a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Refreshing,
}

/// How the list is reconciled after a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Re-fetch the whole list from the store.
    #[default]
    Refetch,
    /// Apply the mutation to the local list without another round-trip.
    Local,
}

/// What happened to the list after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Refetched,
    AppliedLocally,
    /// The mutation was stored but the follow-up fetch failed; see
    /// `load_error()`.
    RefetchFailed,
}

#[derive(Debug)]
pub enum ViewModelError {
    /// Input rejected before any store call.
    Validation(RecordValidationError),
    /// Store round-trip failed.
    Remote(StoreError),
}

impl Display for ViewModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Remote(err) => write!(f, "remote store error: {err}"),
        }
    }
}

impl Error for ViewModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Remote(err) => Some(err),
        }
    }
}

/// View-model for the study record list screen.
///
/// Created empty at mount; call [`load`](Self::load) to populate it.
pub struct RecordListViewModel<S: RecordStore> {
    store: S,
    policy: ReconcilePolicy,
    records: Vec<Record>,
    form: FormState,
    phase: LoadPhase,
    load_error: Option<String>,
}

impl<S: RecordStore> RecordListViewModel<S> {
    /// Creates a view-model that re-fetches after every mutation.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, ReconcilePolicy::default())
    }

    pub fn with_policy(store: S, policy: ReconcilePolicy) -> Self {
        Self {
            store,
            policy,
            records: Vec::new(),
            form: FormState::default(),
            phase: LoadPhase::Loading,
            load_error: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authoritative list, in store order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn error_message(&self) -> Option<&str> {
        self.form.error_message.as_deref()
    }

    /// Description of the last failed fetch, cleared by the next success.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.phase
    }

    /// True only until the first fetch completes.
    pub fn is_initial_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// True while any fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase != LoadPhase::Ready
    }

    /// Sum of hours over the current list. Recomputed on every call.
    pub fn total_hours(&self) -> f64 {
        total_hours(&self.records)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    /// Stores raw hours text; unparsable text becomes NaN.
    pub fn set_hours_input(&mut self, raw: &str) {
        self.form.hours = parse_hours_input(raw);
    }

    pub fn clear_error(&mut self) {
        self.form.error_message = None;
    }

    /// Fetches all records and replaces the list on success.
    ///
    /// Returns the number of records now held.
    ///
    /// # Errors
    /// - `Remote` when the store fails or returns duplicate ids or invalid
    ///   records. The list is left untouched; `load_error()` and the inline
    ///   message are set.
    pub fn load(&mut self) -> Result<usize, ViewModelError> {
        self.begin_load();
        let fetched = self.store.select_all();
        self.finish_load(fetched)
    }

    /// Marks a fetch as outstanding.
    ///
    /// For front ends that run `select_all` on their own executor and hand
    /// the result back through [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) {
        if self.phase == LoadPhase::Ready {
            self.phase = LoadPhase::Refreshing;
        }
        info!(
            "event=records_load module=view_model status=start phase={:?}",
            self.phase
        );
    }

    /// Applies a fetch result produced after [`begin_load`](Self::begin_load).
    pub fn finish_load(
        &mut self,
        fetched: StoreResult<Vec<Record>>,
    ) -> Result<usize, ViewModelError> {
        self.phase = LoadPhase::Ready;
        let checked = fetched.and_then(check_fetched);

        match checked {
            Ok(records) => {
                self.records = records;
                self.load_error = None;
                if self.form.error_message.as_deref() == Some(LOAD_FAILED_MESSAGE) {
                    self.form.error_message = None;
                }
                info!(
                    "event=records_load module=view_model status=ok backend={} count={}",
                    self.store.backend_name(),
                    self.records.len()
                );
                Ok(self.records.len())
            }
            Err(err) => {
                error!(
                    "event=records_load module=view_model status=error backend={} kept_count={} error={}",
                    self.store.backend_name(),
                    self.records.len(),
                    err
                );
                self.load_error = Some(err.to_string());
                self.form.error_message = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(ViewModelError::Remote(err))
            }
        }
    }

    /// Puts `title`/`hours` into the form and submits it.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        hours: f64,
    ) -> Result<MutationOutcome, ViewModelError> {
        self.form.title = title.into();
        self.form.hours = hours;
        self.submit()
    }

    /// Validates the form and inserts it as a new record.
    ///
    /// # Errors
    /// - `Validation`: inline message set, no store call made.
    /// - `Remote`: inline message set, form inputs kept for retry.
    pub fn submit(&mut self) -> Result<MutationOutcome, ViewModelError> {
        if let Err(err) = validate(&self.form.title, self.form.hours) {
            warn!(
                "event=record_add module=view_model status=rejected title_len={} reason={}",
                self.form.title.chars().count(),
                err
            );
            self.form.error_message = Some(VALIDATION_FAILED_MESSAGE.to_string());
            return Err(ViewModelError::Validation(err));
        }

        let started_at = Instant::now();
        let payload = NewRecord::new(self.form.title.clone(), self.form.hours);
        match self.store.insert(&payload) {
            Ok(created) => {
                info!(
                    "event=record_add module=view_model status=ok id={} duration_ms={}",
                    created.id,
                    started_at.elapsed().as_millis()
                );
                self.form.reset();
                Ok(self.reconcile(|records| {
                    records.iter().cloned().chain(std::iter::once(created)).collect()
                }))
            }
            Err(err) => {
                error!(
                    "event=record_add module=view_model status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.form.error_message = Some(SAVE_FAILED_MESSAGE.to_string());
                Err(ViewModelError::Remote(err))
            }
        }
    }

    /// Deletes one record by id.
    ///
    /// The id is not checked against the local list; the store reports
    /// missing ids.
    pub fn remove(&mut self, id: RecordId) -> Result<MutationOutcome, ViewModelError> {
        let started_at = Instant::now();
        match self.store.delete_by_id(id) {
            Ok(()) => {
                info!(
                    "event=record_remove module=view_model status=ok id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.form.error_message = None;
                Ok(self.reconcile(|records| {
                    records
                        .iter()
                        .filter(|record| record.id != id)
                        .cloned()
                        .collect()
                }))
            }
            Err(err) => {
                error!(
                    "event=record_remove module=view_model status=error id={id} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.form.error_message = Some(DELETE_FAILED_MESSAGE.to_string());
                Err(ViewModelError::Remote(err))
            }
        }
    }

    fn reconcile(
        &mut self,
        apply_locally: impl FnOnce(&[Record]) -> Vec<Record>,
    ) -> MutationOutcome {
        if self.policy == ReconcilePolicy::Local {
            let next = apply_locally(&self.records);
            match find_duplicate_id(&next) {
                None => {
                    self.records = next;
                    return MutationOutcome::AppliedLocally;
                }
                Some(id) => warn!(
                    "event=records_reconcile module=view_model status=rejected duplicate_id={id}"
                ),
            }
        }

        match self.load() {
            Ok(_) => MutationOutcome::Refetched,
            Err(_) => MutationOutcome::RefetchFailed,
        }
    }
}

fn check_fetched(records: Vec<Record>) -> StoreResult<Vec<Record>> {
    if let Some(id) = find_duplicate_id(&records) {
        return Err(StoreError::InvalidData(format!(
            "duplicate record id {id} in fetched list"
        )));
    }
    for record in &records {
        record
            .validate()
            .map_err(|err| StoreError::InvalidData(format!("record {}: {err}", record.id)))?;
    }
    Ok(records)
}
