//! Error types for chefboot-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from parsing or rendering templates.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An emitted line references a variable the context does not set.
    #[error("template '{template}' needs variable '{name}', which is not set")]
    MissingVariable { template: String, name: String },

    /// Template text could not be parsed.
    #[error("template '{template}' line {line}: {message}")]
    Parse {
        template: String,
        line: usize,
        message: String,
    },

    /// No template is registered under this name.
    #[error("unknown template '{name}'")]
    UnknownTemplate { name: String },

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}
