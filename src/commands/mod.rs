//! CLI commands for packhorse
//!
//! - **build**: run the packaging pipeline, produce the versioned archive
//! - **deploy**: run the pipeline, then upload the artifact to the host
//!
//! Both commands accept `&ProjectContext` so configuration is loaded once.

pub mod build;
pub mod deploy;

pub use build::run_build;
pub use deploy::run_deploy;
