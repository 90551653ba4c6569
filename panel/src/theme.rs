//! Light/dark theme mode.
//!
//! `ThemeApplier` owns the one `ThemeMode` value. It seeds it from the
//! system color-scheme preference, flips it on every toggle click, and
//! pushes each change to a `ThemeTarget` (the document root in a browser
//! shell). The `data-color` attribute and the `theme-dark` class are both
//! derived from that single mode, so they never disagree.

use std::collections::BTreeSet;
use std::fmt;

/// Class present on the root element while dark mode is on.
pub const DARK_CLASS: &str = "theme-dark";

/// Root attribute carrying the mode name.
pub const COLOR_ATTRIBUTE: &str = "data-color";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Initial mode from a `prefers-color-scheme` query.
    ///
    /// `None` means the query could not be made; that counts as light.
    #[must_use]
    pub fn from_system_preference(prefers_dark: Option<bool>) -> Self {
        if prefers_dark.unwrap_or(false) { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Value written to the `data-color` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the mode is rendered. Receives every change, including the initial one.
pub trait ThemeTarget {
    fn apply(&mut self, mode: ThemeMode);
}

/// Owner of the current theme mode.
#[derive(Debug)]
pub struct ThemeApplier<T> {
    mode: ThemeMode,
    target: T,
}

impl<T: ThemeTarget> ThemeApplier<T> {
    /// Seed the mode from the system preference and apply it to `target`.
    pub fn new(mut target: T, prefers_dark: Option<bool>) -> Self {
        let mode = ThemeMode::from_system_preference(prefers_dark);
        target.apply(mode);
        Self { mode, target }
    }

    /// Handle a click on the toggle control. Returns the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.target.apply(self.mode);
        self.mode
    }

    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

// =============================================================================
// IN-MEMORY ROOT
// =============================================================================

/// A document root modelled as an attribute value plus a class list.
///
/// Used by non-browser shells and by tests to observe what a real root
/// element would carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    color: Option<&'static str>,
    classes: BTreeSet<String>,
}

impl DocumentRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `data-color` attribute value, if ever set.
    #[must_use]
    pub fn color_attribute(&self) -> Option<&str> {
        self.color
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl ThemeTarget for DocumentRoot {
    fn apply(&mut self, mode: ThemeMode) {
        self.color = Some(mode.as_str());
        if mode.is_dark() {
            self.classes.insert(DARK_CLASS.to_owned());
        } else {
            self.classes.remove(DARK_CLASS);
        }
    }
}

// =============================================================================
// BROWSER ROOT
// =============================================================================

/// The live `<html>` element. Requires a browser environment.
#[cfg(feature = "web")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRoot;

#[cfg(feature = "web")]
impl ThemeTarget for HtmlRoot {
    fn apply(&mut self, mode: ThemeMode) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let _ = el.set_attribute(COLOR_ATTRIBUTE, mode.as_str());
        let _ = el.class_list().toggle_with_force(DARK_CLASS, mode.is_dark());
    }
}

/// Query `prefers-color-scheme: dark`. `None` when the query is unavailable.
#[cfg(feature = "web")]
#[must_use]
pub fn system_prefers_dark() -> Option<bool> {
    web_sys::window()?
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
}

/// Page-load entry point: seed from the system preference and apply it to
/// `<html>`. The shell keeps the returned applier and calls
/// [`ThemeApplier::toggle`] from its toggle button's click handler.
#[cfg(feature = "web")]
#[must_use]
pub fn init_browser_theme() -> ThemeApplier<HtmlRoot> {
    ThemeApplier::new(HtmlRoot, system_prefers_dark())
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
