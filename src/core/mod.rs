//! Core plumbing for packhorse
//!
//! - **config**: packhorse.toml parsing with built-in defaults
//! - **context**: immutable per-invocation project state
//! - **error**: error taxonomy, exit codes, and context helpers

pub mod config;
pub mod context;
pub mod error;
