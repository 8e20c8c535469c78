use crate::core::error::{ConfigError, PackResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for packhorse
/// Searched in order: packhorse.toml, .packhorse.toml, .config/packhorse.toml
///
/// Every field has a built-in default so the tool runs without a config
/// file. The loaded value is immutable for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
  pub project: ProjectConfig,
  /// Include rules evaluated in order against the project root
  pub include: Vec<IncludeRule>,
  /// Patterns removed from the staging tree after copy
  pub exclude: Vec<String>,
  pub upload: UploadSettings,
  pub versions: VersionMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Package name; defaults to the project root directory name
  pub name: Option<String>,

  /// Build output directory, relative to the project root
  pub build_dir: PathBuf,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: None,
      build_dir: PathBuf::from("build"),
    }
  }
}

/// What an include pattern denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
  Directory,
  Glob,
  File,
}

impl RuleKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Directory => "directory",
      Self::Glob => "glob",
      Self::File => "file",
    }
  }
}

impl std::fmt::Display for RuleKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One declarative file-selection rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeRule {
  pub pattern: String,
  pub kind: RuleKind,

  /// A required rule that matches nothing aborts the build;
  /// an optional one is skipped with a warning.
  #[serde(default = "default_required")]
  pub required: bool,
}

fn default_required() -> bool {
  true
}

impl IncludeRule {
  pub fn directory(pattern: &str, required: bool) -> Self {
    Self {
      pattern: pattern.to_string(),
      kind: RuleKind::Directory,
      required,
    }
  }

  pub fn glob(pattern: &str, required: bool) -> Self {
    Self {
      pattern: pattern.to_string(),
      kind: RuleKind::Glob,
      required,
    }
  }

  pub fn file(pattern: &str, required: bool) -> Self {
    Self {
      pattern: pattern.to_string(),
      kind: RuleKind::File,
      required,
    }
  }
}

/// Upload endpoint and release metadata settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
  /// API host; override for self-hosted or test endpoints
  pub base_url: String,

  /// 'alpha', 'beta', or 'release'
  pub release_type: String,

  /// Format of the changelog text sent with the upload
  pub changelog_type: String,

  /// Changelog document, relative to the project root
  pub changelog: PathBuf,

  /// Fail the deploy instead of falling back to the default release
  /// channels when the manifest's interface version is unmapped
  pub strict_versions: bool,

  /// Upload request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for UploadSettings {
  fn default() -> Self {
    Self {
      base_url: "https://wow.curseforge.com".to_string(),
      release_type: "release".to_string(),
      changelog_type: "markdown".to_string(),
      changelog: PathBuf::from("CHANGELOG.md"),
      strict_versions: false,
      timeout_secs: 120,
    }
  }
}

/// Static mapping from interface version to host release-channel ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionMap {
  pub map: BTreeMap<String, Vec<u64>>,

  /// Channels used when the interface version is unmapped (non-strict mode)
  pub default: Vec<u64>,
}

impl Default for VersionMap {
  fn default() -> Self {
    let mut map = BTreeMap::new();
    map.insert("110200".to_string(), vec![13433]); // The War Within (11.2.0)
    map.insert("110107".to_string(), vec![13203]); // The War Within (11.1.7)
    map.insert("110105".to_string(), vec![12918]); // The War Within (11.1.5)
    map.insert("110007".to_string(), vec![12215]); // The War Within (11.0.7)
    map.insert("110005".to_string(), vec![11926]); // The War Within (11.0.5)
    map.insert("110002".to_string(), vec![11596]); // The War Within (11.0.2)
    map.insert("110000".to_string(), vec![11274]); // The War Within (11.0.0)
    Self {
      map,
      default: vec![13433],
    }
  }
}

impl VersionMap {
  /// Look up the release channels for an exact interface version
  pub fn get(&self, interface_version: &str) -> Option<&Vec<u64>> {
    self.map.get(interface_version)
  }
}

impl Default for PackConfig {
  fn default() -> Self {
    Self {
      project: ProjectConfig::default(),
      include: vec![
        IncludeRule::directory("libs", true),
        IncludeRule::directory("modules", true),
        IncludeRule::directory("textures", false),
        IncludeRule::glob("*.lua", false),
        IncludeRule::glob("*.toc", true),
        IncludeRule::file("CHANGELOG.md", false),
        IncludeRule::file("README.md", false),
      ],
      exclude: vec![
        "*.sh".to_string(),
        "*.js".to_string(),
        "*.json".to_string(),
        ".gitignore".to_string(),
        "node_modules".to_string(),
        "build".to_string(),
        ".DS_Store".to_string(),
      ],
      upload: UploadSettings::default(),
      versions: VersionMap::default(),
    }
  }
}

impl PackConfig {
  /// Find config file in search order: packhorse.toml, .packhorse.toml, .config/packhorse.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("packhorse.toml"),
      root.join(".packhorse.toml"),
      root.join(".config").join("packhorse.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to built-in defaults when no file exists
  pub fn load(root: &Path) -> PackResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: PackConfig = toml_edit::de::from_str(&content).map_err(|e| ConfigError::Invalid {
      path: config_path.clone(),
      message: e.to_string(),
    })?;

    Ok(config)
  }
}
