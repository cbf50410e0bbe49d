//! Output file bookkeeping: directories, checksummed names and "latest" pointers.
//!
//! A finished output file is renamed to embed the first characters of its MD5
//! digest, and a small text file under `latest_filenames/` records the final
//! name so downstream tools can find the most recent run for a label.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of hex digits of the MD5 digest embedded in file names
pub const CHECKSUM_PREFIX_LEN: usize = 10;
/// Directory (relative to the output root) holding the latest-name pointer files
pub const LATEST_FILENAMES_DIR: &str = "latest_filenames";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Create the directory that will contain `path` if it is missing
pub fn ensure_containing_directory_exists(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(io_error(parent))
        }
        _ => Ok(()),
    }
}

/// Delete a previous output at `path`, if there is one.
///
/// Returns whether a file was removed.
pub fn remove_existing(path: &Path) -> Result<bool, OutputError> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(io_error(path))?;
    Ok(true)
}

/// Hex MD5 digest of a file's contents
pub fn md5_hex(path: &Path) -> Result<String, OutputError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    Ok(format!("{:x}", md5::compute(&bytes)))
}

/// Build `{stem}_{checksum}{.ext}` next to the original path
fn checksummed_path(path: &Path, checksum: &str) -> Result<PathBuf, OutputError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| OutputError::NoFileName(path.to_path_buf()))?;
    let filename = match path.extension().and_then(|s| s.to_str()) {
        Some(extension) => format!("{stem}_{checksum}.{extension}"),
        None => format!("{stem}_{checksum}"),
    };
    Ok(path.with_file_name(filename))
}

/// Rename a file so its name carries a prefix of its MD5 digest.
///
/// `output/run.fits` becomes `output/run_0123456789.fits`. Returns the new path.
pub fn append_md5sum_to_filename(path: &Path) -> Result<PathBuf, OutputError> {
    let digest = md5_hex(path)?;
    let new_path = checksummed_path(path, &digest[..CHECKSUM_PREFIX_LEN])?;
    fs::rename(path, &new_path).map_err(io_error(path))?;
    Ok(new_path)
}

/// Record `latest_filename` as the most recent output for `output_label`.
///
/// Writes `{root}/latest_filenames/latest_{label}.txt` containing the name and a
/// trailing newline. Returns the pointer file path.
pub fn write_latest_filename(
    root: &Path,
    output_label: &str,
    latest_filename: &str,
) -> Result<PathBuf, OutputError> {
    let holder = root
        .join(LATEST_FILENAMES_DIR)
        .join(format!("latest_{output_label}.txt"));
    ensure_containing_directory_exists(&holder)?;
    fs::write(&holder, format!("{latest_filename}\n")).map_err(io_error(&holder))?;
    info!("Updated {}", holder.display());
    Ok(holder)
}
