//! Release-notes extraction from a changelog document
//!
//! The newest release's notes are the topmost `## `-delimited section.
//! Extraction must never fail a deploy: an absent or unreadable document,
//! or an empty section, yields a generated fallback that references the
//! version being released.

use std::fs;
use std::path::Path;

/// Text of the topmost section of the changelog at `path`, or None when
/// the document is missing, unreadable, or has no usable section.
pub fn latest_section(path: &Path) -> Option<String> {
  let content = fs::read_to_string(path).ok()?;
  let section = extract_first_section(&content);
  if section.is_empty() { None } else { Some(section) }
}

/// Changelog text for an upload: the latest section when one exists,
/// otherwise the generated fallback.
pub fn changelog_text(path: &Path, version: &str) -> String {
  latest_section(path).unwrap_or_else(|| fallback_text(version))
}

fn extract_first_section(content: &str) -> String {
  let mut lines = Vec::new();
  let mut in_section = false;

  for line in content.lines() {
    if line.starts_with("## ") {
      if in_section {
        break;
      }
      in_section = true;
      continue;
    }

    // blank lines are dropped, matching the released notes format
    if in_section && !line.trim().is_empty() {
      lines.push(line);
    }
  }

  lines.join("\n")
}

fn fallback_text(version: &str) -> String {
  format!(
    "Release version {}\n\nSee README.md for detailed feature information.",
    version
  )
}
