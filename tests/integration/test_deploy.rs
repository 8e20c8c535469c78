//! Integration tests for `packhorse deploy`
//!
//! The upload endpoint is a local axum server that checks the API token
//! header and the multipart shape the host expects, so a passing deploy
//! here exercises the whole wire format.

use crate::helpers::{TestAddon, run_packhorse_raw};
use anyhow::Result;
use axum::Router;
use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

const GOOD_TOKEN: &str = "sekrit-token";

async fn upload_handler(headers: HeaderMap, mut multipart: Multipart) -> (StatusCode, String) {
  let token = headers.get("x-api-token").and_then(|v| v.to_str().ok());
  if token != Some(GOOD_TOKEN) {
    return (StatusCode::FORBIDDEN, r#"{"errorMessage":"bad token"}"#.to_string());
  }

  let mut metadata = None;
  let mut file_bytes = None;

  while let Ok(Some(field)) = multipart.next_field().await {
    match field.name().map(str::to_string).as_deref() {
      Some("metadata") => metadata = field.text().await.ok(),
      Some("file") => file_bytes = field.bytes().await.ok(),
      _ => {}
    }
  }

  let Some(metadata) = metadata else {
    return (
      StatusCode::BAD_REQUEST,
      r#"{"errorMessage":"missing metadata part"}"#.to_string(),
    );
  };
  let parsed: serde_json::Value = match serde_json::from_str(&metadata) {
    Ok(value) => value,
    Err(_) => {
      return (
        StatusCode::BAD_REQUEST,
        r#"{"errorMessage":"metadata is not JSON"}"#.to_string(),
      );
    }
  };
  for key in ["changelog", "changelogType", "displayName", "gameVersions", "releaseType"] {
    if parsed.get(key).is_none() {
      return (
        StatusCode::BAD_REQUEST,
        format!(r#"{{"errorMessage":"metadata missing {}"}}"#, key),
      );
    }
  }

  let Some(bytes) = file_bytes else {
    return (
      StatusCode::BAD_REQUEST,
      r#"{"errorMessage":"missing file part"}"#.to_string(),
    );
  };
  if !bytes.starts_with(b"PK") {
    return (
      StatusCode::BAD_REQUEST,
      r#"{"errorMessage":"file part is not a zip"}"#.to_string(),
    );
  }

  (StatusCode::OK, r#"{"id": 42}"#.to_string())
}

/// Spawn the mock host on an ephemeral port, returning its base URL.
fn spawn_upload_mock() -> Result<String> {
  let runtime = tokio::runtime::Runtime::new()?;
  let listener = runtime.block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))?;
  let addr = listener.local_addr()?;

  std::thread::spawn(move || {
    runtime.block_on(async move {
      let app = Router::new().route("/api/projects/{id}/upload-file", post(upload_handler));
      let _ = axum::serve(listener, app).await;
    });
  });

  Ok(format!("http://{}", addr))
}

fn addon_with_endpoint(name: &str, base_url: &str) -> Result<TestAddon> {
  let addon = TestAddon::new(name)?;
  addon.write_config(&format!("[upload]\nbase_url = \"{}\"\n", base_url))?;
  Ok(addon)
}

#[test]
fn test_deploy_uploads_successfully() -> Result<()> {
  let base_url = spawn_upload_mock()?;
  let addon = addon_with_endpoint("DeployOk", &base_url)?;
  addon.write_file("CHANGELOG.md", "## v1.0\n- initial release\n")?;

  let output = run_packhorse_raw(
    &addon.path,
    &["deploy"],
    &[
      ("CURSEFORGE_API_TOKEN", GOOD_TOKEN),
      ("CURSEFORGE_PROJECT_ID", "12345"),
    ],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(output.status.success(), "stdout: {}\nstderr: {}", stdout, stderr);
  assert!(stdout.contains("File ID: 42"), "stdout: {}", stdout);
  assert!(addon.archive_path("1.0").exists(), "deploy builds before uploading");
  Ok(())
}

#[test]
fn test_deploy_rejected_with_bad_token() -> Result<()> {
  let base_url = spawn_upload_mock()?;
  let addon = addon_with_endpoint("DeployRejected", &base_url)?;

  let output = run_packhorse_raw(
    &addon.path,
    &["deploy"],
    &[
      ("CURSEFORGE_API_TOKEN", "wrong-token"),
      ("CURSEFORGE_PROJECT_ID", "12345"),
    ],
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(!output.status.success());
  assert!(stderr.contains("403"), "stderr: {}", stderr);
  assert!(stderr.contains("bad token"), "stderr: {}", stderr);
  Ok(())
}

#[test]
fn test_deploy_requires_token_before_building() -> Result<()> {
  let addon = TestAddon::new("NoToken")?;

  let output = run_packhorse_raw(&addon.path, &["deploy"], &[])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(!output.status.success());
  assert!(stderr.contains("CURSEFORGE_API_TOKEN"), "stderr: {}", stderr);
  assert!(
    !addon.path.join("build").exists(),
    "credential check must run before any build work"
  );
  Ok(())
}

#[test]
fn test_deploy_requires_numeric_project_id() -> Result<()> {
  let addon = TestAddon::new("BadProjectId")?;

  let output = run_packhorse_raw(
    &addon.path,
    &["deploy"],
    &[
      ("CURSEFORGE_API_TOKEN", GOOD_TOKEN),
      ("CURSEFORGE_PROJECT_ID", "not-a-number"),
    ],
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(!output.status.success());
  assert!(stderr.contains("must be numeric"), "stderr: {}", stderr);
  Ok(())
}

#[test]
fn test_deploy_strict_versions_rejects_unmapped_interface() -> Result<()> {
  let addon = TestAddon::new("StrictVersions")?;
  addon.write_file(
    "StrictVersions.toc",
    "## Interface: 999999\n## Title: StrictVersions\n## Version: 1.0\n",
  )?;
  // port 9 is discard; strict mode must fail before any request is made
  addon.write_config("[upload]\nbase_url = \"http://127.0.0.1:9\"\nstrict_versions = true\n")?;

  let output = run_packhorse_raw(
    &addon.path,
    &["deploy"],
    &[
      ("CURSEFORGE_API_TOKEN", GOOD_TOKEN),
      ("CURSEFORGE_PROJECT_ID", "12345"),
    ],
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(!output.status.success());
  assert!(stderr.contains("Unknown interface version: 999999"), "stderr: {}", stderr);
  Ok(())
}

#[test]
fn test_deploy_transport_failure_is_fatal() -> Result<()> {
  // nothing listens here; the connection is refused
  let addon = addon_with_endpoint("NoHost", "http://127.0.0.1:1")?;

  let output = run_packhorse_raw(
    &addon.path,
    &["deploy"],
    &[
      ("CURSEFORGE_API_TOKEN", GOOD_TOKEN),
      ("CURSEFORGE_PROJECT_ID", "12345"),
    ],
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(!output.status.success());
  assert!(stderr.contains("upload request failed"), "stderr: {}", stderr);
  Ok(())
}
