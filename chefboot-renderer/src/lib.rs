//! # chefboot-renderer
//!
//! Renders Chef bootstrap files (`client.rb`, `knife.rb`) from a small
//! installer-snippet template dialect.
//!
//! Template text is parsed once into a [`Template`] (an ordered list of
//! [`Node`]s) and evaluated against a [`Context`](chefboot_core::Context) by
//! the pure function [`render`].
//!
//! ```rust,no_run
//! use chefboot_core::Context;
//! use chefboot_renderer::{TemplateEngine, TemplateKind};
//!
//! fn client_rb(ctx: &Context) -> Result<String, chefboot_renderer::RenderError> {
//!     let engine = TemplateEngine::new(None)?;
//!     engine.render(TemplateKind::KickstartClient, ctx)
//! }
//! ```

pub mod ast;
pub mod engine;
pub mod error;
pub mod eval;
pub mod parser;

pub use ast::{Branch, Node, Predicate, Segment, Template};
pub use engine::{TemplateEngine, TemplateKind, DEFAULT_TRUSTED_CERTS_SOURCE};
pub use error::RenderError;
pub use eval::render;
pub use parser::parse;
