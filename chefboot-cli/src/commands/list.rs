//! `chefboot list`: template kinds and their default locations.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use chefboot_renderer::{TemplateEngine, TemplateKind};

/// Arguments for `chefboot list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct KindRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "output")]
    output: String,
    #[tabled(rename = "trusted certs")]
    trusted_certs: String,
    #[tabled(rename = "variables")]
    variables: String,
}

fn rows(engine: &TemplateEngine) -> Result<Vec<KindRow>> {
    TemplateKind::all()
        .iter()
        .map(|kind| {
            let root = kind.default_root();
            let template = engine
                .template(kind.template_name())
                .with_context(|| format!("template for '{kind}' is not loaded"))?;
            Ok(KindRow {
                kind: kind.name().to_string(),
                template: kind.template_name().to_string(),
                output: kind.output_path(root).display().to_string(),
                trusted_certs: kind
                    .trusted_certs_dir(root)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
                variables: template.variables().join(", "),
            })
        })
        .collect()
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let engine = TemplateEngine::new(None).context("failed to load templates")?;
        let rows = rows(&engine)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
