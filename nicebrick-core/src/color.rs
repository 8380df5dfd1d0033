//! Hex color parameters for generated artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const DEFAULT_PRIMARY_COLOR: &str = "#5ab0ff";
pub const DEFAULT_SECONDARY_COLOR: &str = "#ff7bfb";

/// A normalized `#rrggbb` color (lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = String, example = "#5ab0ff"))]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a six-digit hex color, with or without a leading `#`.
    ///
    /// Surrounding whitespace is ignored. Anything other than exactly six hex
    /// digits is rejected.
    pub fn parse(field: &str, input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::missing(field));
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid(
                field,
                format!("'{}' is not a 6-digit hex color", input),
            ));
        }
        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    pub fn default_primary() -> Self {
        Self(DEFAULT_PRIMARY_COLOR.to_string())
    }

    pub fn default_secondary() -> Self {
        Self(DEFAULT_SECONDARY_COLOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green, blue channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("color", s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse("color", &value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}
