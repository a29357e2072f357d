//! Loading of the generation context and of manifest files.
//!
//! The context may come from a file, from stdin (either a plain map or the
//! payload a scaffolding tool writes to a hook's stdin) and from `KEY=VALUE`
//! overrides, applied in that order.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::options::{raw_context_from_json, RawContext};

/// Payload a scaffolding tool pipes into its post-generation hook.
#[derive(Debug, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub context: serde_json::Value,
}

/// A context together with the project directory it may have named.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedContext {
    pub raw: RawContext,
    pub output_dir: Option<PathBuf>,
}

/// Parses content as JSON, falling back to YAML.
///
/// YAML is read into a JSON value first, so both formats share the JSON
/// encoding of enums (`{disabled: api}` rather than YAML tags).
fn parse_document<T: DeserializeOwned>(content: &str, what: &str) -> Result<T> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("invalid {what} format: {e}")))?,
    };
    serde_json::from_value(value).map_err(|e| Error::ConfigError(format!("invalid {what}: {e}")))
}

/// Interprets a JSON document as either a hook payload or a plain context map.
pub fn context_from_value(value: serde_json::Value) -> Result<LoadedContext> {
    if !value.is_object() {
        return Err(Error::ConfigError("context must be a mapping".to_string()));
    }

    if value.get("context").is_some_and(|c| c.is_object()) {
        let payload: HookPayload = serde_json::from_value(value)
            .map_err(|e| Error::ConfigError(format!("invalid hook payload: {e}")))?;
        debug!("Context received as hook payload from '{:?}'", payload.template_dir);
        return Ok(LoadedContext {
            raw: raw_context_from_json(&payload.context),
            output_dir: payload.output_dir,
        });
    }

    Ok(LoadedContext { raw: raw_context_from_json(&value), output_dir: None })
}

/// Parses context text (JSON or YAML).
pub fn parse_context(content: &str) -> Result<LoadedContext> {
    let value: serde_json::Value = parse_document(content, "context")?;
    context_from_value(value)
}

/// Loads a context file.
pub fn load_context_file<P: AsRef<Path>>(path: P) -> Result<LoadedContext> {
    let path = path.as_ref();
    debug!("Loading context from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read context '{}': {e}", path.display()))
    })?;
    parse_context(&content)
}

/// Reads the context from stdin.
pub fn load_context_from_stdin() -> Result<LoadedContext> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_context(buffer.trim())
}

/// Applies `KEY=VALUE` overrides on top of a loaded context.
pub fn apply_overrides(context: &mut LoadedContext, overrides: &[(String, String)]) {
    for (key, value) in overrides {
        context.raw.insert(key.clone(), value.clone());
    }
}

/// Parses manifest text (JSON or YAML) and validates it.
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let manifest: Manifest = parse_document(content, "manifest")?;
    manifest.validate()?;
    Ok(manifest)
}

/// Loads a manifest from a JSON or YAML file and validates it.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    debug!("Loading manifest from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read manifest '{}': {e}", path.display()))
    })?;
    parse_manifest(&content)
}
