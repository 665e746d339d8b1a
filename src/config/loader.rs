//! Configuration loader with layer-based merging.
//!
//! Loads the base document and any optional overlays, merges them in
//! priority order, validates the result and decodes it into a
//! [`ConfigDocument`].

use super::interpolate;
use super::merge::merge_all;
use super::types::ConfigDocument;
use super::validate::{policy_warnings, validate};
use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Configuration layer priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    /// Base document (required)
    Base = 0,
    /// User-level overrides
    User = 1,
    /// Per-run preset (highest priority)
    Preset = 2,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Base => write!(f, "base"),
            Layer::User => write!(f, "user"),
            Layer::Preset => write!(f, "preset"),
        }
    }
}

/// Where a layer document comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// A YAML file on disk.
    File(PathBuf),
    /// YAML text already in memory, with a name for error messages.
    Yaml { name: String, text: String },
    /// An already-parsed document.
    Value(Value),
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File(path.into())
    }

    pub fn yaml(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source::Yaml {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Name used in log lines and error messages.
    pub fn name(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Yaml { name, .. } => name.clone(),
            Source::Value(_) => "<document>".to_string(),
        }
    }

    /// Read and parse this source into a normalized top-level mapping.
    ///
    /// Returns `Ok(None)` for an optional file that does not exist.
    fn read(&self, required: bool) -> Result<Option<Value>> {
        let name = self.name();
        let parsed = match self {
            Source::File(path) => {
                let content = match std::fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        if required {
                            return Err(ConfigError::load(name, "file not found"));
                        }
                        return Ok(None);
                    }
                    Err(e) => {
                        return Err(ConfigError::Io {
                            source_name: name,
                            source: e,
                        });
                    }
                };
                parse_yaml(&name, &content)?
            }
            Source::Yaml { text, .. } => parse_yaml(&name, text)?,
            Source::Value(value) => value.clone(),
        };

        match normalize_keys(parsed) {
            Value::Null => Ok(Some(Value::Object(Map::new()))),
            value @ Value::Object(_) => Ok(Some(value)),
            _ => Err(ConfigError::load(name, "top level must be a mapping")),
        }
    }
}

fn parse_yaml(name: &str, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<Value>(text).map_err(|e| ConfigError::load(name, e.to_string()))
}

/// Strip a single leading `:` from every mapping key, recursively.
///
/// `:id: api` and `id: api` name the same field.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key.strip_prefix(':') {
                        Some(stripped) => stripped.to_string(),
                        None => key,
                    };
                    (key, normalize_keys(value))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// One source per layer, loaded in fixed priority order.
#[derive(Debug, Clone)]
pub struct LayerSources {
    pub base: Source,
    pub user: Option<Source>,
    pub preset: Option<Source>,
}

impl LayerSources {
    pub fn new(base: Source) -> Self {
        Self {
            base,
            user: None,
            preset: None,
        }
    }

    pub fn with_user(mut self, user: Option<Source>) -> Self {
        self.user = user;
        self
    }

    pub fn with_preset(mut self, preset: Option<Source>) -> Self {
        self.preset = preset;
        self
    }

    fn overlays(&self) -> [Option<Source>; 2] {
        [self.user.clone(), self.preset.clone()]
    }

    pub fn load(&self) -> Result<ConfigDocument> {
        ConfigStore::load(&self.base, &self.overlays())
    }

    pub fn load_merged(&self) -> Result<Value> {
        ConfigStore::load_merged(&self.base, &self.overlays())
    }
}

/// Loads, merges and validates layered wizard documents.
pub struct ConfigStore;

impl ConfigStore {
    /// Load, merge, validate and decode.
    ///
    /// `base` is required; each overlay is optional and a missing one is an
    /// empty layer. Every call returns a freshly built document.
    pub fn load(base: &Source, overlays: &[Option<Source>]) -> Result<ConfigDocument> {
        let merged = Self::load_merged(base, overlays)?;
        let document = ConfigDocument::from_value(merged)?;
        for warning in policy_warnings(&document) {
            warn!("{}", warning);
        }
        Ok(document)
    }

    /// Load, merge and validate, returning the merged document untyped.
    pub fn load_merged(base: &Source, overlays: &[Option<Source>]) -> Result<Value> {
        let mut layers: Vec<Value> = Vec::with_capacity(overlays.len() + 1);

        let base_value = base
            .read(true)?
            .ok_or_else(|| ConfigError::load(base.name(), "file not found"))?;
        debug!(layer = %Layer::Base, source = %base.name(), "Loaded configuration layer");
        layers.push(base_value);

        for (index, overlay) in overlays.iter().enumerate() {
            let Some(source) = overlay else {
                debug!(overlay = index, "Optional layer not provided, skipping");
                continue;
            };
            match source.read(false)? {
                Some(value) => {
                    debug!(overlay = index, source = %source.name(), "Loaded configuration layer");
                    layers.push(value);
                }
                None => {
                    debug!(overlay = index, source = %source.name(), "Optional layer not found, skipping");
                }
            }
        }

        let merged = merge_all(layers);
        let issues = validate(&merged);
        if !issues.is_empty() {
            return Err(ConfigError::Validation { issues });
        }
        Ok(merged)
    }

    /// Expand a flag template; see [`interpolate::interpolate`].
    pub fn interpolate(template: Option<&str>, value: &Value) -> Result<Option<String>> {
        interpolate::interpolate(template, value)
    }
}
