use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{membership::MEMBERSHIP_TOPIC, resource::DEFAULT_ROOT};

const SCHEMA_FILE_NAME: &str = "sparse-bridge.schema.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resource: ResourceRuntimeConfig,
    #[serde(default)]
    pub membership: MembershipRuntimeConfig,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("sparse-bridge.sock")
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/bridge")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_resource_roots() -> Vec<String> {
    vec![DEFAULT_ROOT.to_string()]
}

fn default_membership_topics() -> Vec<String> {
    vec![MEMBERSHIP_TOPIC.to_string()]
}

fn default_membership_queue_capacity() -> usize {
    64
}

fn default_membership_max_in_flight() -> usize {
    16
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRuntimeConfig {
    #[serde(default = "default_resource_roots")]
    pub roots: Vec<String>,
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for ResourceRuntimeConfig {
    fn default() -> Self {
        Self {
            roots: default_resource_roots(),
            seed_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipRuntimeConfig {
    #[serde(default = "default_membership_topics")]
    pub topics: Vec<String>,
    #[serde(default = "default_membership_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_membership_max_in_flight")]
    pub max_in_flight: usize,
    #[serde(default)]
    pub service: MembershipServiceConfig,
}

impl Default for MembershipRuntimeConfig {
    fn default() -> Self {
        Self {
            topics: default_membership_topics(),
            queue_capacity: default_membership_queue_capacity(),
            max_in_flight: default_membership_max_in_flight(),
            service: MembershipServiceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MembershipServiceConfig {
    #[default]
    Noop,
    Http {
        config: HttpServiceConfig,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub token_env: Option<String>,
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize bridge config")?;

        if !config.socket_path.is_absolute() {
            config.socket_path = config_base.join(&config.socket_path);
        }
        if let Some(seed_path) = &mut config.resource.seed_path
            && !seed_path.is_absolute()
        {
            *seed_path = config_base.join(&*seed_path);
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join(SCHEMA_FILE_NAME);
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or {SCHEMA_FILE_NAME} next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
