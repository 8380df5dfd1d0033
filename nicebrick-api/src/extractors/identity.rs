//! Caller identity from the headers the Farcaster mini-app host forwards.
//!
//! A missing or malformed fid yields an anonymous caller rather than a
//! rejection.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use nicebrick_core::{Identity, SubjectId};

pub const HEADER_FID: &str = "x-farcaster-fid";
pub const HEADER_USERNAME: &str = "x-farcaster-username";
pub const HEADER_DISPLAY_NAME: &str = "x-farcaster-display-name";
pub const HEADER_PFP_URL: &str = "x-farcaster-pfp-url";

/// The caller's identity as forwarded by the mini-app host.
///
/// `None` when the fid header is absent or not a positive integer. Never
/// rejects; callers substitute the fallback identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Option<Identity>);

impl CallerIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let subject_id = match text(HEADER_FID).map(|raw| raw.parse::<SubjectId>()) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Ignoring malformed fid header");
                return Self(None);
            }
            None => return Self(None),
        };

        Self(Some(Identity {
            subject_id,
            username: text(HEADER_USERNAME),
            display_name: text(HEADER_DISPLAY_NAME),
            avatar_url: text(HEADER_PFP_URL),
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_full_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_FID, HeaderValue::from_static("4242"));
        headers.insert(HEADER_USERNAME, HeaderValue::from_static("alice"));
        headers.insert(HEADER_DISPLAY_NAME, HeaderValue::from_static(" Alice "));
        let CallerIdentity(identity) = CallerIdentity::from_headers(&headers);
        let identity = identity.map(|i| (i.subject_id.get(), i.username, i.display_name));
        assert_eq!(
            identity,
            Some((4242, Some("alice".to_string()), Some("Alice".to_string())))
        );
    }

    #[test]
    fn test_missing_or_bad_fid_yields_none() {
        assert_eq!(CallerIdentity::from_headers(&HeaderMap::new()), CallerIdentity(None));

        for bad in ["0", "-1", "abc", ""] {
            let mut headers = HeaderMap::new();
            headers.insert(HEADER_FID, HeaderValue::from_static(bad));
            headers.insert(HEADER_USERNAME, HeaderValue::from_static("alice"));
            assert_eq!(CallerIdentity::from_headers(&headers), CallerIdentity(None));
        }
    }
}
