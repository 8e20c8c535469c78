//! Project context - build once, pass everywhere
//!
//! ProjectContext bundles the project root, the loaded configuration, and
//! the resolved project name. It is constructed once in main.rs and passed
//! by reference into every command, so no component reaches for ambient
//! state.

use crate::core::config::PackConfig;
use crate::core::error::PackResult;
use std::path::{Path, PathBuf};

/// Immutable per-invocation project state.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Loaded packhorse.toml (or built-in defaults)
  pub config: PackConfig,

  /// Resolved package name: config `project.name`, else the root
  /// directory's own name
  pub project_name: String,
}

impl ProjectContext {
  /// Build context from a root directory, loading configuration.
  pub fn build(root: &Path) -> PackResult<Self> {
    let config = PackConfig::load(root)?;
    let project_name = resolve_project_name(root, &config);

    Ok(Self {
      root: root.to_path_buf(),
      config,
      project_name,
    })
  }

  /// Absolute build output directory
  pub fn build_dir(&self) -> PathBuf {
    self.root.join(&self.config.project.build_dir)
  }

  /// Absolute staging directory (the tree that gets archived)
  pub fn staging_dir(&self) -> PathBuf {
    self.build_dir().join(&self.project_name)
  }
}

fn resolve_project_name(root: &Path, config: &PackConfig) -> String {
  if let Some(name) = &config.project.name {
    return name.clone();
  }

  root
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "addon".to_string())
}
