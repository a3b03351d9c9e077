//! chefboot core library: provisioning context, context files, errors.
//!
//! - [`types`]: [`Context`] and variable-name constants
//! - [`error`]: [`ContextError`]
//! - [`context_file`]: YAML context loading and `KEY=VALUE` assignments

pub mod context_file;
pub mod error;
pub mod types;

pub use error::ContextError;
pub use types::{Context, VarAssignment};
