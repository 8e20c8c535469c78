//! Build command implementation

use crate::build::pipeline::{BuildPipeline, BuildResult};
use crate::core::context::ProjectContext;
use crate::core::error::PackResult;

/// Run the build pipeline only.
pub fn run_build(ctx: &ProjectContext) -> PackResult<BuildResult> {
  let result = BuildPipeline::new(ctx).run()?;

  println!();
  println!("✅ Build pipeline completed successfully!");

  Ok(result)
}
