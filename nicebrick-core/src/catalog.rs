//! Fixed content catalog and the per-subject, per-day index selector.

use std::sync::Arc;

use crate::date_key::DateKey;
use crate::error::ConfigError;
use crate::hash::fnv1a_hash;
use crate::identity::SubjectId;

/// Built-in daily wishes, in selection order.
pub const DEFAULT_WISHES: &[&str] = &[
    "May your day be filled with unexpected moments of joy and laughter.",
    "You are capable of amazing things. Trust in your abilities today.",
    "Every challenge you face is an opportunity to grow stronger and wiser.",
    "Your presence makes the world a better place. Never forget your worth.",
    "Today is a perfect day to start something new and exciting.",
    "May the kindness you give find its way back to you tenfold.",
    "Someone is grateful you exist, even if they haven't said it yet.",
    "Small steps still move you forward. Celebrate each one.",
    "May you find calm in the middle of whatever storm comes your way.",
    "Your curiosity is a gift. Follow it somewhere new today.",
    "May an old friend think of you and reach out with good news.",
    "The effort you put in quietly is building something lasting.",
    "Let today surprise you in the best possible way.",
    "You deserve the same patience you so freely give to others.",
    "May your coffee be strong and your inbox be gentle.",
    "The right people will recognize the light you carry.",
    "Rest is not a reward. Take a moment for yourself today.",
    "May you laugh so hard today that you forget what you were worried about.",
    "Your ideas matter. Share one with someone who needs to hear it.",
    "Good things are on their way to you, right on time.",
    "May every door you knock on today open a little wider.",
    "You have already survived every hard day so far. That is strength.",
    "May your work feel meaningful and your evening feel light.",
    "Be proud of how far you have come, and excited for where you are going.",
    "May today hold one small, perfect moment that is entirely yours.",
];

/// Map `(subject_id, date_key)` to a stable index in `[0, list_size)`.
///
/// Computes `fnv1a_hash("{subject_id}-{date_key}") % list_size`. Pure: the same
/// inputs always give the same index, on any host, in any process.
pub fn select_index(
    subject_id: SubjectId,
    date_key: &DateKey,
    list_size: usize,
) -> Result<usize, ConfigError> {
    if list_size == 0 {
        return Err(ConfigError::EmptyCatalog);
    }
    let hash = fnv1a_hash(&format!("{}-{}", subject_id, date_key));
    Ok(hash as usize % list_size)
}

/// The result of selecting today's content for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub index: usize,
    pub content: &'a str,
}

/// Immutable, ordered list of content strings loaded at startup.
///
/// Cloning shares the underlying list.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    entries: Arc<[String]>,
}

impl ContentCatalog {
    pub fn new(entries: Vec<String>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// The built-in wish list.
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_WISHES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a newline-delimited list. Blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Result<Self, ConfigError> {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Select the content for `subject_id` on `date_key`.
    pub fn select(
        &self,
        subject_id: SubjectId,
        date_key: &DateKey,
    ) -> Result<Selection<'_>, ConfigError> {
        let index = select_index(subject_id, date_key, self.len())?;
        let content = self.get(index).ok_or(ConfigError::EmptyCatalog)?;
        Ok(Selection { index, content })
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
