//! chefboot: render Chef bootstrap files during OS provisioning.
//!
//! # Usage
//!
//! ```text
//! chefboot list [--json]
//! chefboot render <kind> [--context FILE] [--var KEY=VALUE]... [--template-dir DIR]
//! chefboot provision <kind> [--root DIR] [--output FILE] [--no-certs] [--dry-run] [--json]
//! chefboot certs <SOURCE> <DEST> [--dry-run]
//! chefboot diff <kind> [--root DIR] [--output FILE]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chefboot_renderer::TemplateKind;
use commands::{
    certs::CertsArgs, diff::DiffArgs, list::ListArgs, provision::ProvisionArgs,
    render::RenderArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "chefboot",
    version,
    about = "Render Chef client and knife bootstrap files for OS provisioning",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the template kinds and where they write.
    List(ListArgs),

    /// Render a template to stdout.
    Render(RenderArgs),

    /// Render a template into a target root and install trusted certificates.
    Provision(ProvisionArgs),

    /// Copy `*.crt` files from one directory into another.
    Certs(CertsArgs),

    /// Show a unified diff of what provision would write.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Shared TemplateKind argument, parsed from CLI strings
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `TemplateKind` from CLI args.
#[derive(Debug, Clone, Copy)]
pub struct TemplateKindArg(pub TemplateKind);

impl FromStr for TemplateKindArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TemplateKind::from_name(s).map(Self).ok_or_else(|| {
            let expected: Vec<&str> = TemplateKind::all().iter().map(|k| k.name()).collect();
            format!(
                "unknown template kind '{s}'; expected: {}",
                expected.join(", ")
            )
        })
    }
}

impl fmt::Display for TemplateKindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<TemplateKindArg> for TemplateKind {
    fn from(k: TemplateKindArg) -> Self {
        k.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::List(args) => args.run(),
        Commands::Render(args) => args.run(),
        Commands::Provision(args) => args.run(),
        Commands::Certs(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
