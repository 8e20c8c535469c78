//! Deterministic zip archive creation
//!
//! The staging tree is compressed into a single zip at maximum deflate
//! compression. Entry names are relative to the staging root (the staging
//! directory itself never appears as a prefix) and are written in sorted
//! order with fixed timestamps, so identical trees produce identical
//! archives.

use crate::core::error::{PackError, PackResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compress `staging` into a zip at `output`, returning the archive size
/// in bytes.
///
/// Failure is fatal and the partially written output is removed
/// best-effort first; callers must treat any leftover file as invalid.
pub fn create_archive(staging: &Path, output: &Path) -> PackResult<u64> {
  match build_zip(staging, output) {
    Ok(size) => Ok(size),
    Err(message) => {
      let _ = fs::remove_file(output);
      Err(PackError::Archive { message })
    }
  }
}

fn build_zip(staging: &Path, output: &Path) -> Result<u64, String> {
  let entries = collect_files(staging).map_err(|e| e.to_string())?;

  let file = fs::File::create(output).map_err(|e| format!("{}: {}", output.display(), e))?;
  let mut writer = ZipWriter::new(file);
  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .compression_level(Some(9));

  for relative in &entries {
    writer
      .start_file(zip_entry_name(relative), options)
      .map_err(|e| e.to_string())?;

    let mut source = fs::File::open(staging.join(relative))
      .map_err(|e| format!("{}: {}", relative.display(), e))?;
    io::copy(&mut source, &mut writer).map_err(|e| e.to_string())?;
  }

  writer.finish().map_err(|e| e.to_string())?;

  let size = fs::metadata(output).map_err(|e| e.to_string())?.len();
  Ok(size)
}

/// All files under `root`, as sorted root-relative paths.
fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
  fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
      let entry = entry?;
      let path = entry.path();
      if entry.file_type()?.is_dir() {
        walk(root, &path, out)?;
      } else if let Ok(relative) = path.strip_prefix(root) {
        out.push(relative.to_path_buf());
      }
    }
    Ok(())
  }

  let mut files = Vec::new();
  walk(root, root, &mut files)?;
  files.sort();
  Ok(files)
}

/// Zip entries always use forward slashes, on every platform.
fn zip_entry_name(relative: &Path) -> String {
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

/// Hex-encoded SHA-256 digest of a file's contents.
pub fn file_sha256(path: &Path) -> PackResult<String> {
  let mut file = fs::File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 64 * 1024];

  loop {
    let read = file.read(&mut buffer)?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
  }

  Ok(hex::encode(hasher.finalize()))
}
