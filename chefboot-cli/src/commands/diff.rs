//! `chefboot diff <kind>`: show the unified diff provision would apply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chefboot_provision::{diff_rendered, ProvisionRequest};

use super::super::TemplateKindArg;
use super::ContextArgs;

/// Arguments for `chefboot diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Template kind (see `chefboot list`).
    pub kind: TemplateKindArg,

    /// Root of the target filesystem.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Compare against this file instead of the default path under root.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let ctx = self.context.load()?;
        let engine = self.context.engine()?;
        let base = ProvisionRequest::new(self.kind.into());
        let request = ProvisionRequest {
            root: self.root.clone().unwrap_or(base.root.clone()),
            output: self.output.clone(),
            ..base
        };

        let diff = diff_rendered(&engine, &request, &ctx)
            .with_context(|| format!("diff failed for '{}'", self.kind))?;

        match diff {
            None => println!("No differences for {}.", request.target_path().display()),
            Some(diff) => {
                print!("{}", diff.unified_diff);
                if !diff.unified_diff.ends_with('\n') {
                    println!();
                }
            }
        }
        Ok(())
    }
}
