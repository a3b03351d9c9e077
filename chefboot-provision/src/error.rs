//! Error types for chefboot-provision.

use std::path::PathBuf;

use thiserror::Error;

use chefboot_renderer::RenderError;

/// All errors that can arise from provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`ProvisionError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ProvisionError {
    ProvisionError::Io {
        path: path.into(),
        source,
    }
}
