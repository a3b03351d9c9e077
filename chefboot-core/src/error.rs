//! Error types for chefboot-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while building or reading a [`Context`](crate::Context).
#[derive(Debug, Error)]
pub enum ContextError {
    /// A command-line assignment was not of the form `KEY=VALUE`.
    #[error("invalid assignment '{input}'; expected KEY=VALUE")]
    InvalidAssignment { input: String },

    /// Underlying I/O failure reading a context file.
    #[error("cannot read context file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the offending file path.
    #[error("failed to parse context file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The context file parsed, but its top level is not a mapping.
    #[error("context file {path} must contain a mapping of variable names to values")]
    NotAMapping { path: PathBuf },
}
