//! Trusted certificate installation.
//!
//! Copies every `*.crt` file from a source directory (typically the Chef
//! server's nginx CA directory) into the target's `trusted_certs` directory
//! so the client accepts the server's self-signed certificate.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chefboot_core::{types::vars, Context};
use chefboot_renderer::DEFAULT_TRUSTED_CERTS_SOURCE;

use crate::error::{io_err, ProvisionError};
use crate::writer::{write_bytes, WriteResult};

/// Only entries whose file name ends with this suffix are copied.
pub const CERT_SUFFIX: &str = ".crt";

/// Source directory for certificates, if certificate installation is on.
///
/// An absent `trusted_certs_path` falls back to
/// [`DEFAULT_TRUSTED_CERTS_SOURCE`]; an explicitly empty one turns the step
/// off.
pub fn certs_source(ctx: &Context) -> Option<PathBuf> {
    let path = ctx.get_or(vars::TRUSTED_CERTS_PATH, DEFAULT_TRUSTED_CERTS_SOURCE);
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// A certificate read from the source directory, held in memory until it is
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertFile {
    pub name: OsString,
    pub bytes: Vec<u8>,
}

/// Read each `*.crt` regular file in `source` (non-recursive), sorted by file
/// name.
///
/// A missing or unreadable `source` is an error. Nothing is written.
pub fn read_certs(source: &Path) -> Result<Vec<CertFile>, ProvisionError> {
    let entries = std::fs::read_dir(source).map_err(|e| io_err(source, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(source, e))?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(CERT_SUFFIX) {
            continue;
        }
        let path = entry.path();
        // Follows symlinks; hashed CA directories are often symlink farms.
        let meta = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
        if !meta.is_file() {
            tracing::debug!("skipping non-file certificate entry: {}", path.display());
            continue;
        }
        paths.push((name, path));
    }
    paths.sort();

    let mut certs = Vec::with_capacity(paths.len());
    for (name, path) in paths {
        let bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
        certs.push(CertFile { name, bytes });
    }

    if certs.is_empty() {
        tracing::warn!("no {} files found in {}", CERT_SUFFIX, source.display());
    }
    Ok(certs)
}

/// Write `certs` into `dest` under their own names. `dest` is created if
/// missing, unless this is a dry run.
pub fn install_certs(
    certs: &[CertFile],
    dest: &Path,
    dry_run: bool,
) -> Result<Vec<WriteResult>, ProvisionError> {
    if !dry_run {
        std::fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;
    }
    certs
        .iter()
        .map(|cert| write_bytes(&dest.join(&cert.name), &cert.bytes, dry_run))
        .collect()
}

/// Copy each `*.crt` regular file in `source` into `dest`, keeping file names
/// and bytes. Every source file is read before `dest` is touched.
pub fn materialize_certs(
    source: &Path,
    dest: &Path,
    dry_run: bool,
) -> Result<Vec<WriteResult>, ProvisionError> {
    let certs = read_certs(source)?;
    install_certs(&certs, dest, dry_run)
}
