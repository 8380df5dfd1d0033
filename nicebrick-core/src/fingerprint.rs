//! Cache keys for generated artifacts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::color::HexColor;
use crate::identity::SubjectId;

/// A stable key derived from every input that affects a generated artifact.
///
/// Components are length-prefixed (`len:value`) and joined with `|`, so no
/// choice of component values can make two distinct input tuples render to
/// the same key. Absent optional components are encoded as `-`, which cannot
/// collide with a present value since those always carry a length prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn builder(kind: &str) -> FingerprintBuilder {
        FingerprintBuilder::new(kind)
    }

    /// Fingerprint of a BearBrick artifact request.
    pub fn bearbrick(
        subject_id: SubjectId,
        primary: &HexColor,
        secondary: &HexColor,
        username: Option<&str>,
        display_name: Option<&str>,
    ) -> Self {
        Self::builder("bearbrick")
            .part(&subject_id.to_string())
            .part(primary.as_str())
            .part(secondary.as_str())
            .optional(username)
            .optional(display_name)
            .build()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the key, hex encoded. Suitable for ETags and response bodies.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incrementally assembles a [`Fingerprint`].
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    buf: String,
}

impl FingerprintBuilder {
    fn new(kind: &str) -> Self {
        let mut builder = Self { buf: String::new() };
        builder.push(kind);
        builder
    }

    fn push(&mut self, value: &str) {
        if !self.buf.is_empty() {
            self.buf.push('|');
        }
        // Length in bytes, so multi-byte text is still unambiguous.
        self.buf.push_str(&value.len().to_string());
        self.buf.push(':');
        self.buf.push_str(value);
    }

    pub fn part(mut self, value: &str) -> Self {
        self.push(value);
        self
    }

    pub fn optional(mut self, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.push(v),
            None => self.buf.push_str("|-"),
        }
        self
    }

    pub fn build(self) -> Fingerprint {
        Fingerprint(self.buf)
    }
}
