//! Declarative file selection against the project root
//!
//! Include rules resolve to concrete paths relative to the root. A
//! `directory` or `file` rule names one path that must exist with the
//! right type; a `glob` rule expands with shell-glob semantics (`*`,
//! `**`, `?`). Required rules that match nothing abort the build.

use crate::core::config::{IncludeRule, RuleKind};
use crate::core::error::{PackError, PackResult, ResultExt};
use std::path::{Path, PathBuf};

/// Resolve one include rule to the relative paths it selects.
///
/// Returns an empty list (after printing a warning) when an optional rule
/// matches nothing; a required rule matching nothing is a fatal error.
pub fn resolve_rule(root: &Path, rule: &IncludeRule) -> PackResult<Vec<PathBuf>> {
  let paths = match rule.kind {
    RuleKind::Directory => {
      let candidate = root.join(&rule.pattern);
      if candidate.is_dir() {
        vec![PathBuf::from(&rule.pattern)]
      } else {
        Vec::new()
      }
    }
    RuleKind::File => {
      let candidate = root.join(&rule.pattern);
      if candidate.is_file() {
        vec![PathBuf::from(&rule.pattern)]
      } else {
        Vec::new()
      }
    }
    RuleKind::Glob => expand_glob(root, &rule.pattern)?,
  };

  if paths.is_empty() {
    if rule.required {
      return Err(PackError::MissingAsset {
        pattern: rule.pattern.clone(),
        kind: rule.kind.as_str().to_string(),
      });
    }
    println!("⚠️  Optional {} not found, skipping: {}", rule.kind, rule.pattern);
  }

  Ok(paths)
}

/// Resolve every rule in order, preserving rule order in the result.
pub fn resolve_rules(root: &Path, rules: &[IncludeRule]) -> PackResult<Vec<PathBuf>> {
  let mut resolved = Vec::new();
  for rule in rules {
    resolved.extend(resolve_rule(root, rule)?);
  }
  Ok(resolved)
}

/// Expand a glob pattern beneath `root`, returning sorted relative paths.
pub fn expand_glob(root: &Path, pattern: &str) -> PackResult<Vec<PathBuf>> {
  let full_pattern = root.join(pattern);
  let full_pattern = full_pattern.to_string_lossy();

  let mut matches: Vec<PathBuf> = glob::glob(&full_pattern)
    .with_context(|| format!("Invalid glob pattern: {}", pattern))?
    .filter_map(|entry| entry.ok())
    .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
    .collect();

  matches.sort();
  Ok(matches)
}
