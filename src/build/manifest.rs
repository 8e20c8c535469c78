//! Addon manifest (.toc) parsing
//!
//! A manifest is a line-oriented document whose metadata lines look like
//! `## Key: Value`. Values keep any embedded colons (URLs survive intact),
//! keys are case-sensitive, and a repeated key overwrites the earlier one.

use crate::core::error::{ManifestError, PackResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Version reported when the manifest has no `## Version:` line
pub const UNKNOWN_VERSION: &str = "unknown";

/// Parsed metadata from a .toc manifest.
///
/// Field order matches the document; lookups scan newest-first so a
/// duplicated key resolves to its last occurrence.
#[derive(Debug, Clone)]
pub struct AddonManifest {
  path: PathBuf,
  fields: Vec<(String, String)>,
}

impl AddonManifest {
  /// Parse the manifest at `path`.
  pub fn parse(path: &Path) -> PackResult<Self> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
      path: path.to_path_buf(),
      source,
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      fields: parse_fields(&content),
    })
  }

  /// Path this manifest was read from
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Look up a metadata field; a duplicated key yields its last value.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .rev()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Addon version, `"unknown"` when absent
  pub fn version(&self) -> &str {
    self.get("Version").unwrap_or(UNKNOWN_VERSION)
  }

  /// Addon title, falling back to the configured project name
  pub fn title<'a>(&'a self, default: &'a str) -> &'a str {
    self.get("Title").unwrap_or(default)
  }

  /// Platform interface version; absence is meaningful to the uploader
  pub fn interface_version(&self) -> Option<&str> {
    self.get("Interface")
  }
}

fn parse_fields(content: &str) -> Vec<(String, String)> {
  let mut fields = Vec::new();

  for line in content.lines() {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix("## ") else {
      continue;
    };

    // Split on the first colon only; the value keeps any further colons
    if let Some((key, value)) = rest.split_once(':') {
      fields.push((key.trim().to_string(), value.trim().to_string()));
    }
  }

  fields
}

/// Find the manifest to build from: the lexicographically first `*.toc`
/// file directly under `root`. Multiple manifests are legal; the ordering
/// makes the pick deterministic rather than filesystem-dependent.
pub fn locate_manifest(root: &Path) -> PackResult<PathBuf> {
  let mut candidates: Vec<PathBuf> = fs::read_dir(root)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|p| p.is_file() && p.extension() == Some(std::ffi::OsStr::new("toc")))
    .collect();

  candidates.sort();

  candidates
    .into_iter()
    .next()
    .ok_or_else(|| ManifestError::NotFound { root: root.to_path_buf() }.into())
}
