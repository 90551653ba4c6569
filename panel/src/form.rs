//! Settings form: load-on-mount, local edits, save with status line.
//!
//! DESIGN
//! ======
//! `SettingsForm` is the synchronous state machine:
//!
//! ```text
//! Loading --finish_load--> Ready { saving: false }
//! Ready { saving: false } --begin_save--> Ready { saving: true }
//! Ready { saving: true } --finish_save--> Ready { saving: false, status }
//! ```
//!
//! `FormController` pairs it with a `SettingsStore` and performs the I/O.
//! The form lives behind an async lock that is released before every store
//! call, so a renderer can read the `Saving...` view while a write is in
//! flight.
//!
//! Load failures are swallowed: the form becomes ready with the built-in
//! defaults and the failure only reaches the log. Save failures become the
//! status line. Nothing retries.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::record::{ARTICLE_COUNT_RANGE, REFRESH_MINUTES_RANGE, SettingsPayload, SettingsRecord};
use crate::store::{SettingsStore, StoreError};

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const SAVE_LABEL: &str = "Save settings";
pub const SAVING_LABEL: &str = "Saving...";
pub const SAVED_MESSAGE: &str = "Settings saved.";
pub const SAVE_ERROR_MESSAGE: &str = "Error saving settings.";

// =============================================================================
// FIELDS
// =============================================================================

/// The three editable inputs, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Keywords,
    ArticleCount,
    RefreshMinutes,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Keywords, Self::ArticleCount, Self::RefreshMinutes];

    /// Wire/input name of the field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::ArticleCount => "article_count",
            Self::RefreshMinutes => "refresh_minutes",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Keywords => "Keywords (comma separated)",
            Self::ArticleCount => "Articles to show",
            Self::RefreshMinutes => "Refresh interval (minutes)",
        }
    }

    /// Advisory min/max for numeric inputs; `None` for free text.
    #[must_use]
    pub fn advisory_range(self) -> Option<RangeInclusive<u32>> {
        match self {
            Self::Keywords => None,
            Self::ArticleCount => Some(ARTICLE_COUNT_RANGE),
            Self::RefreshMinutes => Some(REFRESH_MINUTES_RANGE),
        }
    }

    fn value_of(self, record: &SettingsRecord) -> String {
        match self {
            Self::Keywords => record.keywords.clone(),
            Self::ArticleCount => record.article_count.to_string(),
            Self::RefreshMinutes => record.refresh_minutes.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// A field edit the form refused. The record is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("settings are still loading")]
    NotReady,

    #[error("{field} must be a whole number, got {input:?}")]
    InvalidNumber { field: Field, input: String },
}

/// A save the form refused without contacting the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("settings are still loading")]
    NotReady,

    #[error("a save is already in flight")]
    InFlight,
}

/// Result of a save that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Loading,
    Ready {
        record: SettingsRecord,
        status: Option<String>,
        /// `true` while a write is in flight; the submit control is disabled.
        saving: bool,
    },
}

/// The settings form state machine, without any I/O.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    state: FormState,
    load_requested: bool,
}

impl SettingsForm {
    #[must_use]
    pub fn new() -> Self {
        Self { state: FormState::Loading, load_requested: false }
    }

    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Loading)
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        matches!(self.state, FormState::Ready { saving: true, .. })
    }

    /// The editable record once loading has finished.
    #[must_use]
    pub fn record(&self) -> Option<&SettingsRecord> {
        match &self.state {
            FormState::Loading => None,
            FormState::Ready { record, .. } => Some(record),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match &self.state {
            FormState::Loading => None,
            FormState::Ready { status, .. } => status.as_deref(),
        }
    }

    /// Claim the single initial read. Returns `false` if it was already claimed.
    pub fn begin_load(&mut self) -> bool {
        if self.load_requested || !self.is_loading() {
            return false;
        }
        self.load_requested = true;
        true
    }

    /// Apply the outcome of the initial read and become ready.
    ///
    /// A failed read is logged and otherwise ignored: the form shows
    /// [`SettingsRecord::builtin`]. Calls after the form is ready are no-ops.
    pub fn finish_load(&mut self, result: Result<SettingsPayload, StoreError>) {
        if !self.is_loading() {
            debug!("settings load finished after form was ready; ignoring");
            return;
        }
        let record = match result {
            Ok(payload) => payload.into_record(),
            Err(e) => {
                warn!(error = %e, "settings load failed; using built-in defaults");
                SettingsRecord::builtin()
            }
        };
        self.load_requested = true;
        self.state = FormState::Ready { record, status: None, saving: false };
    }

    /// Replace one field from raw input text.
    ///
    /// Keywords are stored verbatim. Numeric fields are parsed after trimming
    /// whitespace; unparsable input (including empty) is rejected and the
    /// previous value kept. Out-of-range numbers pass through.
    ///
    /// # Errors
    ///
    /// [`EditError::NotReady`] while loading, [`EditError::InvalidNumber`] for
    /// a numeric field that does not parse.
    pub fn edit(&mut self, field: Field, input: &str) -> Result<(), EditError> {
        let FormState::Ready { record, .. } = &mut self.state else {
            return Err(EditError::NotReady);
        };
        match field {
            Field::Keywords => record.keywords = input.to_owned(),
            Field::ArticleCount => record.article_count = parse_number(field, input)?,
            Field::RefreshMinutes => record.refresh_minutes = parse_number(field, input)?,
        }
        Ok(())
    }

    /// Enter the saving sub-state and return the record to submit.
    ///
    /// Clears any previous status message.
    ///
    /// # Errors
    ///
    /// [`SaveError::NotReady`] while loading, [`SaveError::InFlight`] if a
    /// save has not finished yet.
    pub fn begin_save(&mut self) -> Result<SettingsRecord, SaveError> {
        match &mut self.state {
            FormState::Loading => Err(SaveError::NotReady),
            FormState::Ready { saving: true, .. } => Err(SaveError::InFlight),
            FormState::Ready { record, status, saving } => {
                *saving = true;
                *status = None;
                Ok(record.clone())
            }
        }
    }

    /// Leave the saving sub-state and set the status message.
    pub fn finish_save(&mut self, result: Result<(), StoreError>) -> SaveOutcome {
        let outcome = match &result {
            Ok(()) => {
                info!("settings saved");
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(error = %e, "settings save failed");
                SaveOutcome::Failed
            }
        };
        if let FormState::Ready { status, saving, .. } = &mut self.state {
            *saving = false;
            *status = Some(
                match outcome {
                    SaveOutcome::Saved => SAVED_MESSAGE,
                    SaveOutcome::Failed => SAVE_ERROR_MESSAGE,
                }
                .to_owned(),
            );
        }
        outcome
    }

    /// Snapshot of what a renderer should display.
    #[must_use]
    pub fn view(&self) -> FormView {
        match &self.state {
            FormState::Loading => FormView::Loading { placeholder: LOADING_PLACEHOLDER },
            FormState::Ready { record, status, saving } => FormView::Ready {
                fields: Field::ALL
                    .into_iter()
                    .map(|field| FieldView {
                        field,
                        label: field.label(),
                        value: field.value_of(record),
                        range: field.advisory_range(),
                    })
                    .collect(),
                submit: SubmitView { label: if *saving { SAVING_LABEL } else { SAVE_LABEL }, enabled: !*saving },
                status: status.clone(),
            },
        }
    }
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number(field: Field, input: &str) -> Result<u32, EditError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| EditError::InvalidNumber { field, input: input.to_owned() })
}

// =============================================================================
// VIEW
// =============================================================================

/// Rendering contract for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    Loading { placeholder: &'static str },
    Ready { fields: Vec<FieldView>, submit: SubmitView, status: Option<String> },
}

/// One labelled input bound to a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    pub range: Option<RangeInclusive<u32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitView {
    pub label: &'static str,
    pub enabled: bool,
}

impl FormView {
    /// The submit control, or `None` while loading.
    #[must_use]
    pub fn submit(&self) -> Option<SubmitView> {
        match self {
            Self::Loading { .. } => None,
            Self::Ready { submit, .. } => Some(*submit),
        }
    }

    #[must_use]
    pub fn field(&self, field: Field) -> Option<&FieldView> {
        match self {
            Self::Loading { .. } => None,
            Self::Ready { fields, .. } => fields.iter().find(|f| f.field == field),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Loading { .. } => None,
            Self::Ready { status, .. } => status.as_deref(),
        }
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading { placeholder } => writeln!(f, "{placeholder}"),
            Self::Ready { fields, submit, status } => {
                for field in fields {
                    match &field.range {
                        Some(range) => writeln!(
                            f,
                            "{}: {} ({}-{})",
                            field.label,
                            field.value,
                            range.start(),
                            range.end()
                        )?,
                        None => writeln!(f, "{}: {}", field.label, field.value)?,
                    }
                }
                if submit.enabled {
                    writeln!(f, "[{}]", submit.label)?;
                } else {
                    writeln!(f, "[{}] (disabled)", submit.label)?;
                }
                if let Some(status) = status {
                    writeln!(f, "{status}")?;
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Drives a [`SettingsForm`] against a [`SettingsStore`].
///
/// Cheap to clone; clones share the same form and store.
pub struct FormController<S> {
    store: Arc<S>,
    form: Arc<RwLock<SettingsForm>>,
}

impl<S> Clone for FormController<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), form: Arc::clone(&self.form) }
    }
}

impl<S: SettingsStore> FormController<S> {
    /// A controller in the `Loading` state. Call [`Self::load`] to fetch.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store: Arc::new(store), form: Arc::new(RwLock::new(SettingsForm::new())) }
    }

    /// Build a controller and perform the initial read.
    pub async fn mount(store: S) -> Self {
        let controller = Self::new(store);
        controller.load().await;
        controller
    }

    /// Perform the initial read. Only the first call reaches the store.
    pub async fn load(&self) {
        if !self.form.write().await.begin_load() {
            return;
        }
        let result = self.store.load().await;
        self.form.write().await.finish_load(result);
    }

    /// Apply a field edit from raw input text.
    ///
    /// # Errors
    ///
    /// See [`SettingsForm::edit`].
    pub async fn edit(&self, field: Field, input: &str) -> Result<(), EditError> {
        self.form.write().await.edit(field, input)
    }

    /// Submit the current record and wait for the store's answer.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] when the form refuses to start a save; no
    /// request is issued in that case. A store failure is not an error here:
    /// it is reported as [`SaveOutcome::Failed`] and as the status message.
    pub async fn save(&self) -> Result<SaveOutcome, SaveError> {
        let record = self.form.write().await.begin_save()?;
        let result = self.store.save(&record).await;
        Ok(self.form.write().await.finish_save(result))
    }

    pub async fn view(&self) -> FormView {
        self.form.read().await.view()
    }

    pub async fn record(&self) -> Option<SettingsRecord> {
        self.form.read().await.record().cloned()
    }

    pub async fn status(&self) -> Option<String> {
        self.form.read().await.status().map(str::to_owned)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
