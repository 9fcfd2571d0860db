//! Recipe loading.
//!
//! A recipe names one source, an ordered list of transformers and one sink.
//! It is read from YAML, TOML or JSON (by file extension) after `${VAR}` /
//! `$VAR` references are expanded from the environment, then layered with
//! `METAINGEST_` environment overrides (`METAINGEST_SINK__CONFIG__FILENAME`).

use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::ConfigError;

/// Prefix of environment variables overriding recipe values.
pub const ENV_PREFIX: &str = "METAINGEST_";

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap_or_else(|e| unreachable!("invalid env reference pattern: {e}"))
});

/// A plugin reference: registry key plus its free-form config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    #[serde(rename = "type")]
    pub plugin_type: String,
    #[serde(default)]
    pub config: Value,
}

impl PluginConfig {
    pub fn new(plugin_type: impl Into<String>, config: Value) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            config,
        }
    }

    /// Parse this plugin's config into `C`.
    pub fn parse<C: DeserializeOwned>(&self) -> Result<C, ConfigError> {
        parse_plugin_config(&self.plugin_type, &self.config)
    }
}

/// A full recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub run_id: Option<String>,
    pub source: PluginConfig,
    #[serde(default)]
    pub transformers: Vec<PluginConfig>,
    pub sink: PluginConfig,
}

impl PipelineConfig {
    /// Parse a recipe from text in the given format.
    pub fn from_str_with_format(text: &str, format: RecipeFormat) -> Result<Self, ConfigError> {
        Ok(format.figment(text).extract().map_err(Box::new)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormat {
    Yaml,
    Toml,
    Json,
}

impl RecipeFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn figment(self, text: &str) -> Figment {
        match self {
            Self::Yaml => Figment::from(Yaml::string(text)),
            Self::Toml => Figment::from(Toml::string(text)),
            Self::Json => Figment::from(Json::string(text)),
        }
    }
}

/// Load a recipe, expanding references from the process environment.
pub fn load_recipe(path: &Path) -> Result<PipelineConfig, ConfigError> {
    load_recipe_with(path, |name| std::env::var(name).ok())
}

/// Load a recipe, expanding references through `lookup`.
pub fn load_recipe_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PipelineConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = RecipeFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    let text = expand_env_vars(&raw, lookup)?;

    let figment = format
        .figment(&text)
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: PipelineConfig = figment.extract().map_err(Box::new)?;
    debug!(
        path = %path.display(),
        source = %config.source.plugin_type,
        sink = %config.sink.plugin_type,
        transformers = config.transformers.len(),
        "Loaded recipe"
    );
    Ok(config)
}

/// Replace `${VAR}` and `$VAR` references; an unset variable is an error.
pub fn expand_env_vars(
    text: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in ENV_REF.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let value = lookup(name.as_str()).ok_or_else(|| ConfigError::EnvVarMissing {
            name: name.as_str().to_string(),
        })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Deserialize a plugin's config; a missing config is an empty mapping.
pub fn parse_plugin_config<C: DeserializeOwned>(
    plugin: &str,
    config: &Value,
) -> Result<C, ConfigError> {
    let value = match config {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|e| ConfigError::plugin(plugin, e))
}
