//! Interface-version to release-channel resolution
//!
//! The host identifies target platform versions by opaque integer channel
//! ids. The mapping from a manifest's interface version to those ids is
//! static configuration; an unmapped version degrades to the configured
//! default channels with a warning, unless strict mode turns the miss into
//! a deploy failure.

use crate::core::config::{UploadSettings, VersionMap};
use crate::core::error::{PackError, PackResult};

pub struct VersionMapper<'a> {
  versions: &'a VersionMap,
  strict: bool,
}

impl<'a> VersionMapper<'a> {
  pub fn new(versions: &'a VersionMap, settings: &UploadSettings) -> Self {
    Self {
      versions,
      strict: settings.strict_versions,
    }
  }

  /// Resolve release-channel ids for a manifest interface version.
  ///
  /// Exact-match only; no fuzzy or prefix matching.
  pub fn resolve(&self, interface_version: Option<&str>) -> PackResult<Vec<u64>> {
    if let Some(version) = interface_version
      && let Some(channels) = self.versions.get(version)
    {
      return Ok(channels.clone());
    }

    let shown = interface_version.unwrap_or("<none>");
    if self.strict {
      return Err(PackError::with_help(
        format!("Unknown interface version: {}", shown),
        "Add it to [versions.map] in packhorse.toml, or unset upload.strict_versions",
      ));
    }

    println!("⚠️  Unknown interface version: {}, using default channels", shown);
    Ok(self.versions.default.clone())
  }
}
