//! Settings record and its read-side wire shape.
//!
//! The record is a singleton configuration: three flat fields, no identity,
//! replaced wholesale on every save.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Advisory bounds for `article_count`. Shown as the input's min/max, never enforced.
pub const ARTICLE_COUNT_RANGE: RangeInclusive<u32> = 1..=50;

/// Advisory bounds for `refresh_minutes`. Shown as the input's min/max, never enforced.
pub const REFRESH_MINUTES_RANGE: RangeInclusive<u32> = 1..=180;

const BUILTIN_KEYWORDS: &str = "cybersecurity, malware, phishing";
const BUILTIN_ARTICLE_COUNT: u32 = 12;
const BUILTIN_REFRESH_MINUTES: u32 = 30;

const ABSENT_KEYWORDS: &str = "";
const ABSENT_ARTICLE_COUNT: u32 = 10;
const ABSENT_REFRESH_MINUTES: u32 = 30;

// =============================================================================
// RECORD
// =============================================================================

/// The admin-editable news feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Comma-separated topic terms, stored verbatim.
    pub keywords: String,
    /// Number of articles to display.
    pub article_count: u32,
    /// Feed refresh interval in minutes.
    pub refresh_minutes: u32,
}

impl SettingsRecord {
    /// The values the form starts with, and keeps when the initial load fails.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            keywords: BUILTIN_KEYWORDS.to_owned(),
            article_count: BUILTIN_ARTICLE_COUNT,
            refresh_minutes: BUILTIN_REFRESH_MINUTES,
        }
    }

    /// Individual keyword terms, trimmed, with empty entries dropped.
    pub fn keyword_list(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// `true` when both numeric fields sit inside their advisory ranges.
    #[must_use]
    pub fn within_advisory_bounds(&self) -> bool {
        ARTICLE_COUNT_RANGE.contains(&self.article_count) && REFRESH_MINUTES_RANGE.contains(&self.refresh_minutes)
    }
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// READ PAYLOAD
// =============================================================================

/// Body of a settings read. Every key is optional.
///
/// Each key is decoded on its own: `null`, a wrong JSON type, or a number
/// that is not a whole value in `u32` range counts as absent for that key
/// only. Integral floats such as `12.0` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub keywords: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub article_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub refresh_minutes: Option<u32>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => count_from_number(&number),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_from_number(number: &serde_json::Number) -> Option<u32> {
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = number.as_f64()?;
    if f.fract() != 0.0 || f < 0.0 || f > f64::from(u32::MAX) {
        return None;
    }
    Some(f as u32)
}

impl SettingsPayload {
    /// Fill absent keys with the read defaults. These differ from
    /// [`SettingsRecord::builtin`]: a reachable store that omits `keywords`
    /// yields an empty string, not the built-in topic list.
    #[must_use]
    pub fn into_record(self) -> SettingsRecord {
        SettingsRecord {
            keywords: self.keywords.unwrap_or_else(|| ABSENT_KEYWORDS.to_owned()),
            article_count: self.article_count.unwrap_or(ABSENT_ARTICLE_COUNT),
            refresh_minutes: self.refresh_minutes.unwrap_or(ABSENT_REFRESH_MINUTES),
        }
    }
}

impl From<SettingsPayload> for SettingsRecord {
    fn from(payload: SettingsPayload) -> Self {
        payload.into_record()
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
