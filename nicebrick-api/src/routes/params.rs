//! Parsing of raw request fields into validated core types.
//!
//! Request DTOs keep their fields optional so that a missing field is
//! reported as `MISSING_FIELD` with its name instead of a generic parse
//! failure.

use nicebrick_core::{ContentCatalog, DateKey, SubjectId, ValidationError, VoteKind};

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn require<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

pub(crate) fn subject_from_str(raw: Option<&str>) -> Result<SubjectId, ValidationError> {
    require("subjectId", present(raw))?.parse()
}

pub(crate) fn subject_from_u64(raw: Option<u64>) -> Result<SubjectId, ValidationError> {
    SubjectId::new(require("subjectId", raw)?)
}

pub(crate) fn date_key(raw: Option<&str>) -> Result<DateKey, ValidationError> {
    DateKey::parse(require("dateKey", present(raw))?)
}

/// Parsed `dateKey`, or today's UTC key when absent.
pub(crate) fn date_key_or_today(raw: Option<&str>) -> Result<DateKey, ValidationError> {
    match present(raw) {
        Some(value) => DateKey::parse(value),
        None => Ok(DateKey::today()),
    }
}

pub(crate) fn vote_kind(raw: Option<&str>) -> Result<VoteKind, ValidationError> {
    require("voteKind", raw)?.parse()
}

/// A content index that exists in `catalog`.
pub(crate) fn content_index(raw: Option<u64>, catalog: &ContentCatalog) -> Result<usize, ValidationError> {
    let value = require("index", raw)?;
    let limit = catalog.len() as u64;
    if value >= limit {
        return Err(ValidationError::OutOfRange {
            field: "index".to_string(),
            value,
            limit,
        });
    }
    Ok(value as usize)
}

/// Optional text: trimmed, blanks dropped.
pub(crate) fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
