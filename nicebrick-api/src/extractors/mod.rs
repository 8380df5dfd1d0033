//! Custom extractors.
//!
//! Axum's stock extractors reject with plain-text bodies and assorted status
//! codes. The wrappers here turn every rejection into an [`ApiError`] with
//! code `INVALID_INPUT`, so clients always see the same error shape.
//!
//! [`ApiError`]: crate::error::ApiError

mod identity;
mod rejecting;

pub use identity::{
    CallerIdentity, HEADER_DISPLAY_NAME, HEADER_FID, HEADER_PFP_URL, HEADER_USERNAME,
};
pub use rejecting::{ApiJson, ApiPath, ApiQuery};
