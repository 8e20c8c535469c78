//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch addon project laid out like a real one
pub struct TestAddon {
  _root: TempDir,
  pub name: String,
  pub path: PathBuf,
}

impl TestAddon {
  /// Create an addon with the standard layout: manifest, libs/, modules/,
  /// and a couple of lua files.
  pub fn new(name: &str) -> Result<Self> {
    let addon = Self::bare(name)?;

    std::fs::create_dir_all(addon.path.join("libs"))?;
    std::fs::create_dir_all(addon.path.join("modules"))?;
    std::fs::write(
      addon.path.join(format!("{}.toc", name)),
      format!(
        "## Interface: 110200\n## Title: {}\n## Version: 1.0\n## Author: Test\n\nmain.lua\n",
        name
      ),
    )?;
    std::fs::write(addon.path.join("libs/LibStub.lua"), "-- LibStub stub\n")?;
    std::fs::write(addon.path.join("modules/core.lua"), "-- core module\n")?;
    std::fs::write(addon.path.join("main.lua"), "-- entry point\n")?;

    Ok(addon)
  }

  /// Create an empty project directory with no manifest or assets.
  pub fn bare(name: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join(name);
    std::fs::create_dir_all(&path)?;

    Ok(Self {
      _root: root,
      name: name.to_string(),
      path,
    })
  }

  /// Write a file relative to the project root, creating parents.
  pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
    let path = self.path.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Write packhorse.toml at the project root.
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("packhorse.toml", content)
  }

  /// Expected archive location for a given version.
  pub fn archive_path(&self, version: &str) -> PathBuf {
    self
      .path
      .join("build")
      .join(format!("{}-v{}.zip", self.name, version))
  }

  /// Entry names of the built archive.
  pub fn archive_entries(&self, version: &str) -> Result<Vec<String>> {
    let file = std::fs::File::open(self.archive_path(version))?;
    let mut archive = zip::ZipArchive::new(file)?;
    Ok(
      (0..archive.len())
        .map(|i| archive.by_index(i).map(|e| e.name().to_string()))
        .collect::<Result<Vec<_>, _>>()?,
    )
  }
}

/// Run the packhorse CLI, failing the test if it exits non-zero.
pub fn run_packhorse(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_packhorse_raw(cwd, args, &[])?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "packhorse command failed: packhorse {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the packhorse CLI without asserting on the exit status.
///
/// Credential variables are cleared first so the ambient environment
/// never leaks into a test; `envs` then sets what the test needs.
pub fn run_packhorse_raw(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_packhorse");

  let mut command = Command::new(bin);
  command
    .current_dir(cwd)
    .args(args)
    .env_remove("CURSEFORGE_API_TOKEN")
    .env_remove("CURSEFORGE_PROJECT_ID");

  for (key, value) in envs {
    command.env(key, value);
  }

  command.output().context("Failed to run packhorse")
}
