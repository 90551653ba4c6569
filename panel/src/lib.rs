//! Admin panel core: the settings record, the store contract, the settings
//! form controller, and the light/dark theme applier.
//!
//! DESIGN
//! ======
//! Everything here is UI-framework agnostic. The form controller owns one
//! `SettingsRecord` and talks to the backend only through the
//! [`store::SettingsStore`] trait, so a browser shell, the admin CLI, and
//! the tests can all drive the same state machine.

pub mod form;
pub mod record;
pub mod store;
pub mod theme;

pub use form::{Field, FormController, FormView, SaveOutcome, SettingsForm};
pub use record::{SettingsPayload, SettingsRecord};
pub use store::{HttpSettingsStore, SettingsStore, StoreError};
pub use theme::{DocumentRoot, ThemeApplier, ThemeMode, ThemeTarget};
