//! Staging tree assembly and cleanup
//!
//! Resolved include paths are copied into an isolated staging directory at
//! their original relative positions, then exclusion patterns and platform
//! metadata litter are scrubbed out. Copying preserves byte content
//! exactly; the only entries never staged are `.git` directories.
//!
//! Exclusion is strictly best-effort: a pattern that matches nothing, or a
//! file that vanished between match and delete, must not fail the build.

use crate::build::fileset;
use crate::core::error::{PackError, PackResult};
use std::fs;
use std::path::Path;

/// Copy one resolved path (file or directory) from `root` into `staging`
/// at the same relative position.
pub fn stage_path(root: &Path, staging: &Path, relative: &Path) -> PackResult<()> {
  let source = root.join(relative);
  let target = staging.join(relative);

  if source.is_dir() {
    copy_directory_recursive(&source, &target)
  } else {
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(&source, &target)?;
    Ok(())
  }
}

/// Recursively copy a directory, excluding .git
pub fn copy_directory_recursive(source: &Path, target: &Path) -> PackResult<()> {
  if !source.exists() {
    return Err(PackError::message(format!(
      "Source path does not exist: {}",
      source.display()
    )));
  }

  fs::create_dir_all(target)?;

  for entry in fs::read_dir(source)? {
    let entry = entry?;
    let file_type = entry.file_type()?;
    let file_name = entry.file_name();

    if file_name == ".git" {
      continue;
    }

    let source_path = entry.path();
    let target_path = target.join(&file_name);

    if file_type.is_dir() {
      copy_directory_recursive(&source_path, &target_path)?;
    } else {
      fs::copy(&source_path, &target_path)?;
    }
  }

  Ok(())
}

/// Apply exclusion patterns to the staged tree.
///
/// A pattern that names a staged directory outright (node_modules, build)
/// is removed wholesale; anything else is glob-matched beneath the staging
/// root and matched entries are deleted. Errors are swallowed.
pub fn apply_exclusions(staging: &Path, patterns: &[String]) {
  for pattern in patterns {
    let literal = staging.join(pattern);
    if !has_glob_meta(pattern) && literal.is_dir() {
      let _ = fs::remove_dir_all(&literal);
      continue;
    }

    let Ok(matches) = fileset::expand_glob(staging, pattern) else {
      continue;
    };

    for relative in matches {
      remove_staged_entry(&staging.join(relative));
    }
  }
}

/// Remove macOS Finder metadata sidecars anywhere under the staged tree.
/// Like exclusion, this never fails the build.
pub fn remove_metadata_files(staging: &Path) {
  let Ok(matches) = fileset::expand_glob(staging, "**/.DS_Store") else {
    return;
  };

  for relative in matches {
    let _ = fs::remove_file(staging.join(relative));
  }
}

fn remove_staged_entry(path: &Path) {
  if path.is_dir() {
    let _ = fs::remove_dir_all(path);
  } else {
    let _ = fs::remove_file(path);
  }
}

fn has_glob_meta(pattern: &str) -> bool {
  pattern.contains(['*', '?', '['])
}
