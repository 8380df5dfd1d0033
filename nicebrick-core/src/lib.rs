//! Nicebrick Core - Types and Deterministic Selection
//!
//! Pure data types and algorithms shared by every other crate. Nothing in
//! here performs I/O.

pub mod catalog;
pub mod color;
pub mod date_key;
pub mod error;
pub mod fingerprint;
pub mod hash;
pub mod identity;
pub mod vote;

pub use catalog::{select_index, ContentCatalog, Selection, DEFAULT_WISHES};
pub use color::{HexColor, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR};
pub use date_key::DateKey;
pub use error::{
    ConfigError, NiceError, NiceResult, RenderError, StorageError, ValidationError,
};
pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use hash::{fnv1a_hash, FNV_OFFSET_BASIS, FNV_PRIME};
pub use identity::{
    user_label, Identity, IdentityMode, ResolvedIdentity, SubjectId, FALLBACK_DISPLAY_NAME,
    FALLBACK_SUBJECT_ID, FALLBACK_USERNAME,
};
pub use vote::{LedgerKey, VoteKind, VoteOutcome, VoteStatus, VoteTally, VOTE_KEY_PREFIX};
