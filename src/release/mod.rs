//! Release side: version mapping, changelog extraction, and upload
//!
//! - **versions**: interface-version to release-channel resolution
//! - **changelog**: newest-section extraction with a generated fallback
//! - **upload**: multipart submission and response interpretation

pub mod changelog;
pub mod upload;
pub mod versions;
