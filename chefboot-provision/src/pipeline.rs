//! Provisioning pipeline: render, write, install certificates.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use chefboot_core::Context;
use chefboot_renderer::{TemplateEngine, TemplateKind};

use crate::certs::{certs_source, install_certs, read_certs};
use crate::writer::{write_rendered, WriteResult};
use crate::ProvisionError;

/// What to provision and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub kind: TemplateKind,
    /// Root of the target filesystem.
    pub root: PathBuf,
    /// Explicit output file; defaults to the kind's path under `root`.
    pub output: Option<PathBuf>,
    /// Install trusted certificates for kinds that carry them.
    pub install_certs: bool,
    pub dry_run: bool,
}

impl ProvisionRequest {
    /// Request with the kind's default root, certificates on, not a dry run.
    pub fn new(kind: TemplateKind) -> Self {
        ProvisionRequest {
            kind,
            root: kind.default_root().to_path_buf(),
            output: None,
            install_certs: true,
            dry_run: false,
        }
    }

    /// File the rendered template is written to.
    pub fn target_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.kind.output_path(&self.root))
    }

    /// Destination for certificates, when this run installs any.
    pub fn certs_dest(&self) -> Option<PathBuf> {
        if !self.install_certs {
            return None;
        }
        self.kind.trusted_certs_dir(&self.root)
    }
}

/// Outcome of one provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub kind: TemplateKind,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub config: WriteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certs_source: Option<PathBuf>,
    pub certs: Vec<WriteResult>,
}

impl ProvisionReport {
    /// Number of files written (or that would be written in a dry run).
    pub fn changed(&self) -> usize {
        std::iter::once(&self.config)
            .chain(self.certs.iter())
            .filter(|r| r.is_change())
            .count()
    }
}

/// Run one provisioning step.
///
/// The template is rendered and the certificates are read before anything
/// touches the target, so a missing variable or an unreadable certificate
/// source leaves the target untouched.
pub fn run(
    engine: &TemplateEngine,
    request: &ProvisionRequest,
    ctx: &Context,
) -> Result<ProvisionReport, ProvisionError> {
    let started_at = Utc::now();

    let rendered = engine.render(request.kind, ctx)?;
    let pending_certs = match (request.certs_dest(), certs_source(ctx)) {
        (Some(dest), Some(source)) => {
            let files = read_certs(&source)?;
            Some((source, dest, files))
        }
        (Some(_), None) => {
            tracing::debug!("trusted_certs_path is empty; not installing certificates");
            None
        }
        (None, _) => None,
    };

    let config = write_rendered(&request.target_path(), &rendered, request.dry_run)?;
    let (source, certs) = match pending_certs {
        Some((source, dest, files)) => {
            let results = install_certs(&files, &dest, request.dry_run)?;
            (Some(source), results)
        }
        None => (None, Vec::new()),
    };

    Ok(ProvisionReport {
        kind: request.kind,
        started_at,
        dry_run: request.dry_run,
        config,
        certs_source: source,
        certs,
    })
}

/// Relative display form of `path` under `root`, for headers and messages.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
