//! Vote types and ledger key layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date_key::DateKey;
use crate::error::ValidationError;

/// Namespace prefix for every ledger key in the external store.
pub const VOTE_KEY_PREFIX: &str = "nice:vote";

/// The two accepted vote values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = ValidationError;

    /// Only the exact literals `like` and `dislike` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(VoteKind::Like),
            "dislike" => Ok(VoteKind::Dislike),
            other => Err(ValidationError::invalid(
                "voteKind",
                format!("expected 'like' or 'dislike', got '{}'", other),
            )),
        }
    }
}

/// Like/dislike counts for one `(dateKey, index)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoteTally {
    pub likes: u64,
    pub dislikes: u64,
}

impl VoteTally {
    pub fn new(likes: u64, dislikes: u64) -> Self {
        Self { likes, dislikes }
    }

    pub fn count(&self, kind: VoteKind) -> u64 {
        match kind {
            VoteKind::Like => self.likes,
            VoteKind::Dislike => self.dislikes,
        }
    }

    pub fn total(&self) -> u64 {
        self.likes + self.dislikes
    }
}

/// Result of casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Tally after the call.
    pub tally: VoteTally,
    /// The subject had already voted before this call; nothing was mutated.
    pub already_voted: bool,
}

impl VoteOutcome {
    /// After a successful cast the subject has always voted.
    pub fn has_voted(&self) -> bool {
        true
    }

    /// Whether this call recorded a new vote.
    pub fn recorded(&self) -> bool {
        !self.already_voted
    }
}

/// Combined view for a subject: current tally plus whether they voted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteStatus {
    pub tally: VoteTally,
    pub has_voted: bool,
}

/// Addresses the ledger for one `(dateKey, index)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    date_key: DateKey,
    index: usize,
}

impl LedgerKey {
    pub fn new(date_key: DateKey, index: usize) -> Self {
        Self { date_key, index }
    }

    pub fn date_key(&self) -> &DateKey {
        &self.date_key
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn base(&self) -> String {
        format!("{}:{}:{}", VOTE_KEY_PREFIX, self.date_key, self.index)
    }

    pub fn likes_key(&self) -> String {
        format!("{}:likes", self.base())
    }

    pub fn dislikes_key(&self) -> String {
        format!("{}:dislikes", self.base())
    }

    pub fn voters_key(&self) -> String {
        format!("{}:voters", self.base())
    }

    pub fn counter_key(&self, kind: VoteKind) -> String {
        match kind {
            VoteKind::Like => self.likes_key(),
            VoteKind::Dislike => self.dislikes_key(),
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.date_key, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_kind_parse_exact_literals() {
        assert_eq!("like".parse::<VoteKind>(), Ok(VoteKind::Like));
        assert_eq!("dislike".parse::<VoteKind>(), Ok(VoteKind::Dislike));
        assert!("Like".parse::<VoteKind>().is_err());
        assert!(" like".parse::<VoteKind>().is_err());
        assert!("love".parse::<VoteKind>().is_err());
        assert!("".parse::<VoteKind>().is_err());
    }

    #[test]
    fn test_vote_kind_serde_lowercase() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&VoteKind::Dislike)?, "\"dislike\"");
        let kind: VoteKind = serde_json::from_str("\"like\"")?;
        assert_eq!(kind, VoteKind::Like);
        Ok(())
    }

    #[test]
    fn test_ledger_key_layout() -> Result<(), ValidationError> {
        let key = LedgerKey::new(DateKey::parse("2024-01-01")?, 3);
        assert_eq!(key.likes_key(), "nice:vote:2024-01-01:3:likes");
        assert_eq!(key.dislikes_key(), "nice:vote:2024-01-01:3:dislikes");
        assert_eq!(key.voters_key(), "nice:vote:2024-01-01:3:voters");
        assert_eq!(key.counter_key(VoteKind::Like), key.likes_key());
        assert_eq!(key.counter_key(VoteKind::Dislike), key.dislikes_key());
        Ok(())
    }

    #[test]
    fn test_tally_helpers() {
        let tally = VoteTally::new(4, 2);
        assert_eq!(tally.count(VoteKind::Like), 4);
        assert_eq!(tally.count(VoteKind::Dislike), 2);
        assert_eq!(tally.total(), 6);
        assert_eq!(VoteTally::default(), VoteTally::new(0, 0));
    }

    #[test]
    fn test_outcome_flags() {
        let first = VoteOutcome {
            tally: VoteTally::new(1, 0),
            already_voted: false,
        };
        assert!(first.recorded());
        assert!(first.has_voted());

        let repeat = VoteOutcome {
            already_voted: true,
            ..first
        };
        assert!(!repeat.recorded());
        assert!(repeat.has_voted());
    }
}
