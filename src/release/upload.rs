//! Authenticated multipart release upload
//!
//! Builds the JSON metadata sidecar, pairs it with the archive bytes in a
//! multipart form, and POSTs the result to the host's upload endpoint.
//! Response interpretation is a pure function of (status, body) so the
//! protocol rules live in one testable place.

use crate::build::pipeline::BuildResult;
use crate::core::context::ProjectContext;
use crate::core::error::{PackError, PackResult, ResultExt};
use crate::release::changelog;
use crate::release::versions::VersionMapper;
use reqwest::blocking::multipart::{Form, Part};
use serde::Serialize;
use std::time::Duration;

/// Bearer token and project identity, read from the environment before
/// any build work starts.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub token: String,
  pub project_id: u64,
}

impl Credentials {
  pub fn from_env() -> PackResult<Self> {
    let token = std::env::var("CURSEFORGE_API_TOKEN").map_err(|_| {
      PackError::precondition(
        "CURSEFORGE_API_TOKEN environment variable is required",
        "Set it with: export CURSEFORGE_API_TOKEN=your_token_here",
      )
    })?;

    let raw_id = std::env::var("CURSEFORGE_PROJECT_ID").map_err(|_| {
      PackError::precondition(
        "CURSEFORGE_PROJECT_ID environment variable is required",
        "Set it with: export CURSEFORGE_PROJECT_ID=your_project_id_here",
      )
    })?;

    let project_id = raw_id.trim().parse::<u64>().map_err(|_| {
      PackError::precondition(
        format!("CURSEFORGE_PROJECT_ID must be numeric, got '{}'", raw_id),
        "Find the numeric id on your project's About page",
      )
    })?;

    Ok(Self { token, project_id })
  }
}

/// JSON sidecar sent as the `metadata` part of the upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
  pub changelog: String,
  pub changelog_type: String,
  pub display_name: String,
  pub game_versions: Vec<u64>,
  pub release_type: String,
}

/// What a 2xx upload response decodes to.
#[derive(Debug, Clone)]
pub enum UploadResponse {
  /// Parsed JSON body; the host assigns `id` to the new file
  Json(serde_json::Value),
  /// 2xx with a body that was not JSON; degraded but still a success
  Raw(String),
}

impl UploadResponse {
  /// Host-assigned file identifier, when the response carried one
  pub fn file_id(&self) -> Option<u64> {
    match self {
      Self::Json(value) => value.get("id").and_then(|id| id.as_u64()),
      Self::Raw(_) => None,
    }
  }
}

/// Map an HTTP (status, body) pair onto the upload protocol.
///
/// 2xx + JSON is a success; 2xx + non-JSON is a degraded success carrying
/// the raw body; anything else is a rejection whose message prefers the
/// host's `errorMessage` field over the raw body.
pub fn interpret_response(status: u16, body: &str) -> PackResult<UploadResponse> {
  let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);
  let success = (200..300).contains(&status);

  match (success, parsed) {
    (true, Ok(value)) => Ok(UploadResponse::Json(value)),
    (true, Err(_)) => Ok(UploadResponse::Raw(body.to_string())),
    (false, Ok(value)) => {
      let message = value
        .get("errorMessage")
        .and_then(|m| m.as_str())
        .unwrap_or(body)
        .to_string();
      Err(PackError::UploadRejected { status, message })
    }
    (false, Err(_)) => Err(PackError::UploadRejected {
      status,
      message: body.to_string(),
    }),
  }
}

/// Uploads a finished build to the release host.
pub struct ReleaseUploader<'a> {
  ctx: &'a ProjectContext,
  credentials: Credentials,
}

impl<'a> ReleaseUploader<'a> {
  pub fn new(ctx: &'a ProjectContext, credentials: Credentials) -> Self {
    Self { ctx, credentials }
  }

  /// Assemble metadata for `build` from the version map and changelog.
  pub fn build_metadata(&self, build: &BuildResult) -> PackResult<UploadMetadata> {
    let upload = &self.ctx.config.upload;

    let mapper = VersionMapper::new(&self.ctx.config.versions, upload);
    let game_versions = mapper.resolve(build.manifest.interface_version())?;

    let changelog_path = self.ctx.root.join(&upload.changelog);
    let changelog = changelog::changelog_text(&changelog_path, build.version());

    let title = build.manifest.title(&self.ctx.project_name);
    Ok(UploadMetadata {
      changelog,
      changelog_type: upload.changelog_type.clone(),
      display_name: format!("{} v{}", title, build.version()),
      game_versions,
      release_type: upload.release_type.clone(),
    })
  }

  /// Upload the archive with its metadata sidecar. One POST, no retries.
  pub fn upload(&self, build: &BuildResult) -> PackResult<UploadResponse> {
    println!("🚀 Uploading to release host...");
    println!("   Project ID: {}", self.credentials.project_id);
    println!("   Package:    {}", build.archive_path.display());

    let metadata = self.build_metadata(build)?;
    println!("   Display:    {}", metadata.display_name);
    println!("   Channels:   {:?}", metadata.game_versions);

    let metadata_json = serde_json::to_string(&metadata).context("Failed to serialize upload metadata")?;

    let archive_bytes = std::fs::read(&build.archive_path)
      .with_context(|| format!("Failed to read archive {}", build.archive_path.display()))?;

    let file_name = build
      .archive_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| format!("{}.zip", self.ctx.project_name));

    let part = Part::bytes(archive_bytes)
      .file_name(file_name)
      .mime_str("application/zip")
      .context("Failed to build multipart file part")?;
    let form = Form::new().text("metadata", metadata_json).part("file", part);

    let client = reqwest::blocking::Client::builder()
      .timeout(Duration::from_secs(self.ctx.config.upload.timeout_secs))
      .build()?;

    let url = format!(
      "{}/api/projects/{}/upload-file",
      self.ctx.config.upload.base_url, self.credentials.project_id
    );

    let response = client
      .post(&url)
      .header("X-Api-Token", &self.credentials.token)
      .multipart(form)
      .send()?;

    let status = response.status().as_u16();
    let body = response.text()?;

    let outcome = interpret_response(status, &body)?;

    println!("✅ Upload successful!");
    match outcome.file_id() {
      Some(id) => println!("   File ID: {}", id),
      None => println!("   Host returned no file id (non-JSON body)"),
    }

    Ok(outcome)
  }
}
