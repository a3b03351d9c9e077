//! Atomic, content-gated file writer.
//!
//! ## Protocol
//!
//! 1. Normalise CRLF to LF (text only; bytes are written verbatim).
//! 2. SHA-256 hash the new content.
//! 3. Hash the existing file, if any → skip if identical.
//! 4. Dry run stops here and reports what would happen.
//! 5. Write to `<path>.chefboot.tmp`.
//! 6. Rename to final path (atomic on POSIX).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{io_err, ProvisionError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; on-disk content already matches.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    /// `true` for [`WriteResult::Written`] and [`WriteResult::WouldWrite`].
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write rendered text to `path`, normalising line endings to LF.
pub fn write_rendered(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, ProvisionError> {
    let normalized = content.replace("\r\n", "\n");
    write_bytes(path, normalized.as_bytes(), dry_run)
}

/// Write `bytes` to `path` unchanged.
pub fn write_bytes(
    path: &Path,
    bytes: &[u8],
    dry_run: bool,
) -> Result<WriteResult, ProvisionError> {
    let tmp = tmp_path(path);
    write_bytes_with_tmp(path, bytes, dry_run, &tmp)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.chefboot.tmp", path.display()))
}

fn write_bytes_with_tmp(
    path: &Path,
    bytes: &[u8],
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, ProvisionError> {
    let digest = sha256_hex(bytes);

    if existing_digest(path)?.as_deref() == Some(digest.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, bytes).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

fn existing_digest(path: &Path) -> Result<Option<String>, ProvisionError> {
    match std::fs::read(path) {
        Ok(existing) => Ok(Some(sha256_hex(&existing))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
