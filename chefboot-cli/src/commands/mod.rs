pub mod certs;
pub mod diff;
pub mod list;
pub mod provision;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chefboot_provision::WriteResult;
use clap::Args;
use colored::Colorize;

use chefboot_core::{context_file, Context, VarAssignment};
use chefboot_renderer::TemplateEngine;

/// Context and template sources shared by every rendering command.
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// YAML file mapping variable names to values.
    #[arg(long = "context", short = 'c', value_name = "FILE")]
    pub context_file: Option<PathBuf>,

    /// Set a variable; repeatable, applied after `--context`. `KEY=` marks
    /// the variable present but empty.
    #[arg(long = "var", short = 'v', value_name = "KEY=VALUE")]
    pub vars: Vec<VarAssignment>,

    /// Directory of `.tmpl` files overriding the built-in templates.
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,
}

impl ContextArgs {
    pub fn load(&self) -> Result<Context> {
        let mut ctx = match &self.context_file {
            Some(path) => context_file::load_at(path)
                .with_context(|| format!("cannot load context from '{}'", path.display()))?,
            None => Context::new(),
        };
        ctx.merge(self.vars.iter().cloned().collect());
        tracing::debug!(variables = ctx.len(), "context loaded");
        Ok(ctx)
    }

    pub fn engine(&self) -> Result<TemplateEngine> {
        TemplateEngine::new(self.template_dir.as_deref()).context("failed to load templates")
    }
}

pub(crate) fn print_writes(writes: &[WriteResult]) {
    for r in writes {
        match r {
            WriteResult::Written { path } => println!("  {}  {}", "✎".green(), path.display()),
            WriteResult::WouldWrite { path } => {
                println!("  {}  {}", "~".yellow(), path.display())
            }
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
}
