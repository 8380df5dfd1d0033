//! Canonical calendar-date keys.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date in `YYYY-MM-DD` form.
///
/// Only the canonical, zero-padded rendering is accepted so the same logical
/// day always produces the same key (and the same hash input).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-01-01"))]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    /// Parse a canonical date key.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::missing("dateKey"));
        }

        let date = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT).map_err(|e| {
            ValidationError::invalid("dateKey", format!("expected YYYY-MM-DD: {}", e))
        })?;

        let canonical = Self::from_date(date);
        if canonical.0 != trimmed {
            return Err(ValidationError::invalid(
                "dateKey",
                format!("expected zero-padded YYYY-MM-DD, got '{}'", trimmed),
            ));
        }

        Ok(canonical)
    }

    /// Key for the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }

    /// Key for the current UTC calendar date.
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() -> Result<(), ValidationError> {
        let key = DateKey::parse("2024-01-01")?;
        assert_eq!(key.as_str(), "2024-01-01");
        assert_eq!(key.to_string(), "2024-01-01");
        Ok(())
    }

    #[test]
    fn test_parse_trims_whitespace() -> Result<(), ValidationError> {
        assert_eq!(DateKey::parse(" 2024-02-29 ")?.as_str(), "2024-02-29");
        Ok(())
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        assert!(DateKey::parse("2024-1-1").is_err());
        assert!(DateKey::parse("2024-01-01T10:00:00Z").is_err());
        assert!(DateKey::parse("01/01/2024").is_err());
        assert!(DateKey::parse("2023-02-29").is_err());
    }

    #[test]
    fn test_empty_is_missing() {
        assert_eq!(
            DateKey::parse("   "),
            Err(ValidationError::missing("dateKey"))
        );
    }

    #[test]
    fn test_today_round_trips() -> Result<(), ValidationError> {
        let today = DateKey::today();
        assert_eq!(DateKey::parse(today.as_str())?, today);
        Ok(())
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: Result<DateKey, _> = serde_json::from_str("\"2024-03-05\"");
        assert!(ok.is_ok());
        let bad: Result<DateKey, _> = serde_json::from_str("\"yesterday\"");
        assert!(bad.is_err());
    }
}
