//! `chefboot certs <SOURCE> <DEST>`: copy trusted certificates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use chefboot_provision::materialize_certs;

use super::print_writes;

/// Arguments for `chefboot certs`.
#[derive(Args, Debug)]
pub struct CertsArgs {
    /// Directory containing `*.crt` files.
    pub source: PathBuf,

    /// Trusted-certs directory to copy into (created if missing).
    pub dest: PathBuf,

    /// Show what would be copied without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CertsArgs {
    pub fn run(self) -> Result<()> {
        let results = materialize_certs(&self.source, &self.dest, self.dry_run).with_context(|| {
            format!(
                "cannot install certificates from '{}'",
                self.source.display()
            )
        })?;

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        println!(
            "{prefix}{} {} certificate(s) from {}",
            "✓".green(),
            results.len(),
            self.source.display()
        );
        print_writes(&results);
        Ok(())
    }
}
