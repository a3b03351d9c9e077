//! Domain types for a provisioning run.
//!
//! A [`Context`] is the set of named variables handed to one render call.
//! Values are plain strings; a variable counts as *set* only when it is
//! present and non-empty.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContextError;

// ---------------------------------------------------------------------------
// Well-known variable names
// ---------------------------------------------------------------------------

/// Variable names understood by the shipped templates.
pub mod vars {
    pub const CHEF_URL: &str = "chef_url";
    pub const PROXY: &str = "proxy";
    pub const IGNORE_PROXY: &str = "ignore_proxy";
    pub const CHEF_NODE_NAME: &str = "chef_node_name";
    pub const OS_VERSION: &str = "os_version";
    pub const COMPASS_SERVER: &str = "compass_server";
    pub const SERVER: &str = "server";
    pub const TRUSTED_CERTS_PATH: &str = "trusted_certs_path";
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Variables for one render call, keyed by name.
///
/// Backed by a `BTreeMap` so iteration (and anything serialized from it) is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from `(name, value)` pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        for (k, v) in pairs {
            ctx.insert(k, v);
        }
        ctx
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value of `name` if it is set (present and non-empty).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).filter(|v| !v.is_empty())
    }

    /// The value of `name` if present, even when empty.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// `true` when `name` is present and non-empty.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The raw value of `name`, or `default` when the key is absent.
    ///
    /// A key that is present with an empty value returns the empty string,
    /// not `default`.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.raw(name).unwrap_or(default)
    }

    /// Overlay `other` on top of `self`; variables in `other` win.
    pub fn merge(&mut self, other: Context) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collects command-line assignments; a repeated name keeps its last value.
impl FromIterator<VarAssignment> for Context {
    fn from_iter<I: IntoIterator<Item = VarAssignment>>(iter: I) -> Self {
        Context::from_pairs(iter.into_iter().map(|a| (a.name, a.value)))
    }
}

// ---------------------------------------------------------------------------
// VarAssignment
// ---------------------------------------------------------------------------

/// A single `KEY=VALUE` assignment, as passed with `--var`.
///
/// The value may be empty (`proxy=`), which explicitly marks the variable as
/// present but unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarAssignment {
    pub name: String,
    pub value: String,
}

impl FromStr for VarAssignment {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ContextError::InvalidAssignment {
            input: s.to_string(),
        };
        let (name, value) = s.split_once('=').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for VarAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
