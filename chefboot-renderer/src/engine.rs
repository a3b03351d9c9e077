//! Template engine: [`TemplateKind`] enum and [`TemplateEngine`].
//!
//! # Path mapping
//!
//! | Kind             | Template                  | Output (under root)    | Trusted certs (under root) |
//! |------------------|---------------------------|------------------------|----------------------------|
//! | KickstartClient  | `client.rb.tmpl`          | `etc/chef/client.rb`   | -                          |
//! | PreseedClient    | `client.rb.tmpl`          | `etc/chef/client.rb`   | -                          |
//! | FallbackClient   | `client_fallback.rb.tmpl` | `etc/chef/client.rb`   | `etc/chef/trusted_certs`   |
//! | AdminKnife       | `knife.rb.tmpl`           | `root/.chef/knife.rb`  | `root/.chef/trusted_certs` |
//! | ServerKnife      | `knife_server.rb.tmpl`    | `root/.chef/knife.rb`  | -                          |
//!
//! Preseed installs mount the new system under `/target`, so that kind's
//! default root differs from the others.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use chefboot_core::Context;

use crate::ast::Template;
use crate::error::RenderError;
use crate::eval;
use crate::parser;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("client.rb.tmpl", include_str!("templates/client.rb.tmpl")),
    (
        "client_fallback.rb.tmpl",
        include_str!("templates/client_fallback.rb.tmpl"),
    ),
    ("knife.rb.tmpl", include_str!("templates/knife.rb.tmpl")),
    (
        "knife_server.rb.tmpl",
        include_str!("templates/knife_server.rb.tmpl"),
    ),
];

/// Directory the admin/knife variants copy certificates from when
/// `trusted_certs_path` is not supplied.
pub const DEFAULT_TRUSTED_CERTS_SOURCE: &str = "/var/opt/chef-server/nginx/ca";

// ---------------------------------------------------------------------------
// User overrides
// ---------------------------------------------------------------------------

const OVERRIDE_EXTENSION: &str = "tmpl";

/// Lookup key for a template name: `/`-separated and lowercased.
fn template_key(name: &str) -> String {
    name.replace('\\', "/").to_lowercase()
}

/// Every `*.tmpl` file under `root` as `(key, source)`, keyed by its path
/// relative to `root`. A missing `root` yields nothing.
fn read_overrides(root: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let mut found = Vec::new();
    if root.exists() {
        read_override_dir(root, root, &mut found)?;
    }
    Ok(found)
}

fn read_override_dir(
    root: &Path,
    dir: &Path,
    found: &mut Vec<(String, String)>,
) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RenderError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| RenderError::io(dir, e))?.path();
        let meta = std::fs::metadata(&path).map_err(|e| RenderError::io(&path, e))?;
        if meta.is_dir() {
            read_override_dir(root, &path, found)?;
            continue;
        }
        if !meta.is_file() || path.extension() != Some(OsStr::new(OVERRIDE_EXTENSION)) {
            continue;
        }
        let source = std::fs::read_to_string(&path).map_err(|e| RenderError::io(&path, e))?;
        let rel = path.strip_prefix(root).unwrap_or(path.as_path());
        found.push((template_key(&rel.to_string_lossy()), source));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TemplateKind
// ---------------------------------------------------------------------------

/// The shipped bootstrap file variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// `client.rb` with optional server URL, proxy, no-proxy and node name.
    KickstartClient,
    /// Same content as [`TemplateKind::KickstartClient`], written into the
    /// preseed target mount.
    PreseedClient,
    /// `client.rb` resolving the server URL from `chef_url`, then
    /// `compass_server`, then `server`; installs trusted certificates.
    FallbackClient,
    /// Admin `knife.rb`; installs trusted certificates.
    AdminKnife,
    /// Chef-server-side `knife.rb` logging to STDOUT.
    ServerKnife,
}

impl TemplateKind {
    /// All kinds in a stable order.
    pub fn all() -> &'static [TemplateKind] {
        &[
            TemplateKind::KickstartClient,
            TemplateKind::PreseedClient,
            TemplateKind::FallbackClient,
            TemplateKind::AdminKnife,
            TemplateKind::ServerKnife,
        ]
    }

    /// Command-line name, e.g. `fallback-client`.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::KickstartClient => "kickstart-client",
            TemplateKind::PreseedClient => "preseed-client",
            TemplateKind::FallbackClient => "fallback-client",
            TemplateKind::AdminKnife => "admin-knife",
            TemplateKind::ServerKnife => "server-knife",
        }
    }

    /// Inverse of [`TemplateKind::name`]; case-insensitive.
    pub fn from_name(name: &str) -> Option<TemplateKind> {
        let wanted = name.to_ascii_lowercase();
        Self::all().iter().copied().find(|k| k.name() == wanted)
    }

    /// Name of the template this kind renders.
    pub fn template_name(&self) -> &'static str {
        match self {
            TemplateKind::KickstartClient | TemplateKind::PreseedClient => "client.rb.tmpl",
            TemplateKind::FallbackClient => "client_fallback.rb.tmpl",
            TemplateKind::AdminKnife => "knife.rb.tmpl",
            TemplateKind::ServerKnife => "knife_server.rb.tmpl",
        }
    }

    /// Root of the target filesystem when none is given.
    pub fn default_root(&self) -> &'static Path {
        match self {
            TemplateKind::PreseedClient => Path::new("/target"),
            _ => Path::new("/"),
        }
    }

    /// Where the rendered file lands, under `root`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        match self {
            TemplateKind::KickstartClient
            | TemplateKind::PreseedClient
            | TemplateKind::FallbackClient => root.join("etc").join("chef").join("client.rb"),
            TemplateKind::AdminKnife | TemplateKind::ServerKnife => {
                root.join("root").join(".chef").join("knife.rb")
            }
        }
    }

    /// Trusted-certificates directory under `root`, for kinds that install
    /// certificates.
    pub fn trusted_certs_dir(&self, root: &Path) -> Option<PathBuf> {
        match self {
            TemplateKind::FallbackClient => {
                Some(root.join("etc").join("chef").join("trusted_certs"))
            }
            TemplateKind::AdminKnife => Some(root.join("root").join(".chef").join("trusted_certs")),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Parsed template set with optional user overrides.
///
/// `user_template_dir` may contain `.tmpl` files that replace embedded
/// templates of the same (lowercased, relative) name or add new ones.
/// Everything is parsed up front, so a broken override fails construction
/// rather than the first render.
#[derive(Debug)]
pub struct TemplateEngine {
    templates: HashMap<String, Template>,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut sources: HashMap<String, String> = HashMap::new();
        for (name, content) in TPLS {
            sources.insert(template_key(name), (*content).to_string());
        }
        if let Some(dir) = user_template_dir {
            for (name, content) in read_overrides(dir)? {
                sources.insert(name, content);
            }
        }

        let mut templates = HashMap::with_capacity(sources.len());
        for (name, source) in sources {
            let template = parser::parse(&name, &source)?;
            templates.insert(name, template);
        }
        Ok(TemplateEngine { templates })
    }

    /// Look up a parsed template by name.
    pub fn template(&self, name: &str) -> Result<&Template, RenderError> {
        self.templates
            .get(&template_key(name))
            .ok_or_else(|| RenderError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    /// Sorted names of every loaded template.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render the template for `kind`.
    pub fn render(&self, kind: TemplateKind, ctx: &Context) -> Result<String, RenderError> {
        self.render_named(kind.template_name(), ctx)
    }

    /// Render a template by name.
    pub fn render_named(&self, name: &str, ctx: &Context) -> Result<String, RenderError> {
        eval::render(self.template(name)?, ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
