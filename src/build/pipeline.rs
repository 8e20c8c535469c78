//! Build pipeline orchestration
//!
//! Linear stage sequence with no retries: locate manifest, parse it,
//! prepare a fresh staging directory, resolve and copy the file set, apply
//! exclusions, scrub metadata litter, compress. The first failing stage
//! aborts the build and its error propagates to the CLI boundary
//! unchanged.

use crate::build::{archive, fileset, manifest, stage};
use crate::build::manifest::AddonManifest;
use crate::core::context::ProjectContext;
use crate::core::error::{PackResult, ResultExt};
use crate::ui::progress::FileProgress;
use std::fs;
use std::path::PathBuf;

/// Outcome of a successful build. Immutable; the only input the uploader
/// takes.
#[derive(Debug, Clone)]
pub struct BuildResult {
  pub archive_path: PathBuf,
  pub archive_size: u64,
  pub sha256: String,
  pub manifest: AddonManifest,
}

impl BuildResult {
  pub fn version(&self) -> &str {
    self.manifest.version()
  }
}

/// Drives one build invocation against a project context.
pub struct BuildPipeline<'a> {
  ctx: &'a ProjectContext,
}

impl<'a> BuildPipeline<'a> {
  pub fn new(ctx: &'a ProjectContext) -> Self {
    Self { ctx }
  }

  /// Run the full build, producing the versioned archive.
  pub fn run(&self) -> PackResult<BuildResult> {
    println!("🚀 Starting build...");

    let manifest_path = manifest::locate_manifest(&self.ctx.root)?;
    let manifest = AddonManifest::parse(&manifest_path)?;
    println!("   Manifest: {}", manifest.path().display());
    println!(
      "ℹ️  Building {} v{}",
      self.ctx.project_name,
      manifest.version()
    );

    let staging = self.prepare_staging_dir()?;

    println!("🔨 Copying addon files...");
    let entries = fileset::resolve_rules(&self.ctx.root, &self.ctx.config.include)?;
    let mut progress = FileProgress::new(entries.len(), format!("Staging {} entries", entries.len()));
    for relative in &entries {
      stage::stage_path(&self.ctx.root, &staging, relative)
        .with_context(|| format!("Failed to stage {}", relative.display()))?;
      progress.inc();
    }

    println!("🔨 Cleaning up development files...");
    stage::apply_exclusions(&staging, &self.ctx.config.exclude);

    println!("🔨 Removing .DS_Store files...");
    stage::remove_metadata_files(&staging);

    println!("🔨 Creating archive...");
    let archive_name = format!("{}-v{}.zip", self.ctx.project_name, manifest.version());
    let archive_path = self.ctx.build_dir().join(archive_name);

    let archive_size = archive::create_archive(&staging, &archive_path)?;
    let sha256 = archive::file_sha256(&archive_path)?;

    let result = BuildResult {
      archive_path,
      archive_size,
      sha256,
      manifest,
    };

    println!("✅ Build complete: {}", result.archive_path.display());
    println!("   Size:   {:.2} MB", result.archive_size as f64 / 1024.0 / 1024.0);
    println!("   SHA256: {}", result.sha256);

    Ok(result)
  }

  /// Recreate the build output directory from scratch.
  ///
  /// The whole output directory is deleted first so rebuilds are
  /// idempotent; stale archives and staging trees never leak forward.
  fn prepare_staging_dir(&self) -> PackResult<PathBuf> {
    let build_dir = self.ctx.build_dir();
    if build_dir.exists() {
      fs::remove_dir_all(&build_dir)
        .with_context(|| format!("Failed to clear build directory {}", build_dir.display()))?;
    }

    let staging = self.ctx.staging_dir();
    fs::create_dir_all(&staging)
      .with_context(|| format!("Failed to create staging directory {}", staging.display()))?;

    Ok(staging)
  }
}
