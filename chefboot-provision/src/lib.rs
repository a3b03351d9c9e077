//! # chefboot-provision
//!
//! Writes rendered bootstrap files onto a target filesystem and installs
//! trusted certificates.
//!
//! Call [`pipeline::run`] for a full provisioning step, or use
//! [`write_rendered`] and [`materialize_certs`] directly.

pub mod certs;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use certs::{certs_source, install_certs, materialize_certs, read_certs, CertFile};
pub use diff::{diff_rendered, FileDiff};
pub use error::ProvisionError;
pub use pipeline::{ProvisionReport, ProvisionRequest};
pub use writer::{write_bytes, write_rendered, WriteResult};
