//! `chefboot render <kind>`: print a rendered template.

use anyhow::{Context, Result};
use clap::Args;

use super::super::TemplateKindArg;
use super::ContextArgs;

/// Arguments for `chefboot render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template kind (see `chefboot list`).
    #[arg(required_unless_present = "template")]
    pub kind: Option<TemplateKindArg>,

    /// Render a template by file name instead of kind, e.g. one added with
    /// `--template-dir`.
    #[arg(long, conflicts_with = "kind", value_name = "NAME")]
    pub template: Option<String>,

    #[command(flatten)]
    pub context: ContextArgs,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let ctx = self.context.load()?;
        let engine = self.context.engine()?;

        let rendered = match (self.kind, &self.template) {
            (_, Some(name)) => engine
                .render_named(name, &ctx)
                .with_context(|| format!("render failed for template '{name}'"))?,
            (Some(kind), None) => engine
                .render(kind.into(), &ctx)
                .with_context(|| format!("render failed for '{kind}'"))?,
            (None, None) => anyhow::bail!("provide a template kind or --template"),
        };

        print!("{rendered}");
        Ok(())
    }
}
