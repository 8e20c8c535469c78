//! Deploy command implementation
//!
//! Credentials are validated before any build work starts, so a missing
//! token fails fast instead of after a full archive pass.

use crate::build::pipeline::BuildPipeline;
use crate::core::context::ProjectContext;
use crate::core::error::PackResult;
use crate::release::upload::{Credentials, ReleaseUploader};

/// Run the build pipeline, then upload the artifact.
pub fn run_deploy(ctx: &ProjectContext) -> PackResult<()> {
  let credentials = Credentials::from_env()?;

  let build = BuildPipeline::new(ctx).run()?;

  let uploader = ReleaseUploader::new(ctx, credentials);
  uploader.upload(&build)?;

  println!();
  println!("✅ Deployment pipeline completed successfully!");
  println!();
  println!("Next steps:");
  println!("  1. Check your project page for the uploaded file");
  println!("  2. The file needs host approval before it is publicly available");
  println!("  3. Update project descriptions or screenshots as needed");

  Ok(())
}
