//! YAML context files.
//!
//! A context file is a flat mapping of variable names to scalar values:
//!
//! ```yaml
//! chef_url: https://10.145.88.211:443
//! proxy: http://10.145.81.1:3128
//! ignore_proxy: 127.0.0.1,localhost
//! chef_node_name: host1.ostack
//! os_version: rhel7
//! ```
//!
//! Numbers and booleans are stringified; `null` values are treated as absent.
//! Nested sequences or mappings are rejected.

use std::path::Path;

use serde_yaml::Value;

use crate::error::ContextError;
use crate::types::Context;

/// Load a [`Context`] from the YAML file at `path`.
pub fn load_at(path: &Path) -> Result<Context, ContextError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

/// Parse context YAML. `path` is only used for error messages.
pub fn parse(path: &Path, contents: &str) -> Result<Context, ContextError> {
    let not_a_mapping = || ContextError::NotAMapping {
        path: path.to_path_buf(),
    };

    // An empty file is an empty context.
    if contents.trim().is_empty() {
        return Ok(Context::new());
    }

    let value: Value = serde_yaml::from_str(contents).map_err(|source| ContextError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mapping = match value {
        Value::Mapping(m) => m,
        Value::Null => return Ok(Context::new()),
        _ => return Err(not_a_mapping()),
    };

    let mut ctx = Context::new();
    for (key, value) in mapping {
        let key = scalar_to_string(key).ok_or_else(not_a_mapping)?;
        match value {
            Value::Null => continue,
            other => {
                let value = scalar_to_string(other).ok_or_else(not_a_mapping)?;
                ctx.insert(key, value);
            }
        }
    }
    Ok(ctx)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string((*tagged).value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
