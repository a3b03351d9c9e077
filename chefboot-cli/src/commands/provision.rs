//! `chefboot provision <kind>`: write a rendered file into a target root.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use chefboot_provision::{pipeline, ProvisionReport, ProvisionRequest};

use super::super::TemplateKindArg;
use super::{print_writes, ContextArgs};

/// Arguments for `chefboot provision`.
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Template kind (see `chefboot list`).
    pub kind: TemplateKindArg,

    /// Root of the target filesystem (default: `/`, or `/target` for
    /// `preseed-client`).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Write the rendered file here instead of its default path under root.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not install trusted certificates.
    #[arg(long)]
    pub no_certs: bool,

    /// Show what would be written without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit a machine-readable JSON report.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub context: ContextArgs,
}

impl ProvisionArgs {
    pub fn request(&self) -> ProvisionRequest {
        let base = ProvisionRequest::new(self.kind.into());
        ProvisionRequest {
            root: self.root.clone().unwrap_or(base.root.clone()),
            output: self.output.clone(),
            install_certs: !self.no_certs,
            dry_run: self.dry_run,
            ..base
        }
    }

    pub fn run(self) -> Result<()> {
        let ctx = self.context.load()?;
        let engine = self.context.engine()?;
        let request = self.request();

        let report = pipeline::run(&engine, &request, &ctx)
            .with_context(|| format!("provision failed for '{}'", self.kind))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &ProvisionReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let total = 1 + report.certs.len();
    println!(
        "{prefix}{} '{}' provisioned ({} changed, {} unchanged)",
        "✓".green(),
        report.kind,
        report.changed(),
        total - report.changed()
    );
    print_writes(std::slice::from_ref(&report.config));
    if let Some(source) = &report.certs_source {
        println!("  certificates from {}:", source.display());
        print_writes(&report.certs);
    }
}
