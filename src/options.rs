//! Option resolution for the generation context.
//! Every value produced by the templating engine arrives as text; this module
//! turns the raw context into typed flags plus the package name.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use crate::constants::{FLAG_NAMES, PACKAGE_NAME_KEY};
use crate::error::{Error, Result};

/// Raw generation context: option name to its textual value, in input order.
pub type RawContext = IndexMap<String, String>;

/// Tolerant truthy parser. Only `true`, `1` and `yes` (any case) are true;
/// the text is compared as is, surrounding whitespace included.
pub fn to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Converts a JSON scalar into the text the templating engine would have produced.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Builds a [`RawContext`] from a JSON object, ignoring non-object input.
pub fn raw_context_from_json(value: &Value) -> RawContext {
    value
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), value_to_text(v))).collect())
        .unwrap_or_default()
}

/// Resolved feature flags. Unknown names read as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(IndexMap<String, bool>);

impl Flags {
    /// Resolves every recognized flag (missing ones are `false`) and every
    /// other key of the context except the package name.
    pub fn resolve(raw: &RawContext) -> Self {
        let mut flags: IndexMap<String, bool> = FLAG_NAMES
            .iter()
            .map(|name| {
                let enabled = raw.get(*name).map(|v| to_bool(v)).unwrap_or(false);
                (name.to_string(), enabled)
            })
            .collect();

        for (key, value) in raw {
            if key != PACKAGE_NAME_KEY && !flags.contains_key(key) {
                flags.insert(key.clone(), to_bool(value));
            }
        }

        Self(flags)
    }

    pub fn is_enabled(&self, flag: &str) -> bool {
        self.0.get(flag).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Typed options the rest of the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub package_name: String,
    pub flags: Flags,
}

impl Options {
    /// Resolves the raw context.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `package_name` is missing, empty or not a
    ///   single path segment. Flag values never fail.
    pub fn resolve(raw: &RawContext) -> Result<Self> {
        let package_name = raw
            .get(PACKAGE_NAME_KEY)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        validate_package_name(&package_name)?;

        let flags = Flags::resolve(raw);
        debug!("Resolved flags for '{}': {:?}", package_name, flags);

        Ok(Self { package_name, flags })
    }

    pub fn is_enabled(&self, flag: &str) -> bool {
        self.flags.is_enabled(flag)
    }

    /// Context handed to the template renderer: the package name plus every flag.
    pub fn to_context(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(PACKAGE_NAME_KEY.to_string(), Value::String(self.package_name.clone()));
        for (name, enabled) in self.flags.iter() {
            map.insert(name.to_string(), Value::Bool(enabled));
        }
        Value::Object(map)
    }

    /// Returns `(child, parent)` pairs where the child is on but its parent is off.
    pub fn inconsistencies<'a>(
        &self,
        dependencies: &'a IndexMap<String, String>,
    ) -> Vec<(&'a str, &'a str)> {
        dependencies
            .iter()
            .filter(|(child, parent)| self.is_enabled(child) && !self.is_enabled(parent))
            .map(|(child, parent)| (child.as_str(), parent.as_str()))
            .collect()
    }

    /// Logs a warning for each inconsistent combination. Nothing is rejected:
    /// the parent's removal rules take precedence.
    pub fn warn_inconsistencies(&self, dependencies: &IndexMap<String, String>) {
        for (child, parent) in self.inconsistencies(dependencies) {
            warn!("'{child}' is enabled but '{parent}' is not; '{child}' has no effect");
        }
    }
}

fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ValidationError(format!("'{PACKAGE_NAME_KEY}' is required")));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::ValidationError(format!(
            "'{PACKAGE_NAME_KEY}' must be a single path segment, got '{name}'"
        )));
    }
    Ok(())
}
