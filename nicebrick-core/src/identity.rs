//! Subject identities supplied by the external identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Subject id used when the identity provider is unavailable.
pub const FALLBACK_SUBJECT_ID: u64 = 777_000;
pub const FALLBACK_USERNAME: &str = "bearbrick-demo";
pub const FALLBACK_DISPLAY_NAME: &str = "BearBrick Explorer";

/// Opaque numeric identity of a user (a Farcaster FID). Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = u64, example = 12345))]
#[serde(try_from = "u64", into = "u64")]
pub struct SubjectId(u64);

impl SubjectId {
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::invalid(
                "subjectId",
                "must be a positive number",
            ));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u64>().map_err(|_| {
            ValidationError::invalid("subjectId", format!("'{}' is not a positive integer", s))
        })?;
        Self::new(value)
    }
}

impl TryFrom<u64> for SubjectId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for u64 {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

/// A user as described by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject_id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            username: None,
            display_name: None,
            avatar_url: None,
        }
    }

    /// The deterministic identity substituted in disconnected/demo mode.
    pub fn fallback() -> Self {
        Self {
            subject_id: SubjectId(FALLBACK_SUBJECT_ID),
            username: Some(FALLBACK_USERNAME.to_string()),
            display_name: Some(FALLBACK_DISPLAY_NAME.to_string()),
            avatar_url: None,
        }
    }

    /// Human-facing label: display name, then username, then `FID n`.
    pub fn label(&self) -> String {
        user_label(
            self.subject_id,
            self.username.as_deref(),
            self.display_name.as_deref(),
        )
    }
}

/// Label used in metadata and previews. Blank names are skipped.
pub fn user_label(
    subject_id: SubjectId,
    username: Option<&str>,
    display_name: Option<&str>,
) -> String {
    display_name
        .filter(|s| !s.trim().is_empty())
        .or(username.filter(|s| !s.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("FID {}", subject_id))
}

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Supplied by the identity provider.
    Live,
    /// Fallback identity, provider unavailable.
    Mock,
}

/// An identity together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIdentity {
    pub user: Identity,
    pub mode: IdentityMode,
}

impl ResolvedIdentity {
    /// Use the provider's identity when present, otherwise the fallback.
    pub fn resolve(provided: Option<Identity>) -> Self {
        match provided {
            Some(user) => Self {
                user,
                mode: IdentityMode::Live,
            },
            None => Self {
                user: Identity::fallback(),
                mode: IdentityMode::Mock,
            },
        }
    }

    pub fn is_mock(&self) -> bool {
        self.mode == IdentityMode::Mock
    }
}
