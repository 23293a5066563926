pub mod endpoints;
mod env_overrides;
pub mod http_client;
pub mod log;
pub mod output;

use std::convert::Infallible;
use std::path::PathBuf;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use crate::env_overrides::{EnvVarOverrides, EnvVarOverridesError};
use crate::{
    endpoints::EndpointsConfig, http_client::HttpClientConfig, log::LoggingConfig,
    output::OutputConfig,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// The logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// The relay and simple GraphQL endpoints to introspect.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Timeouts and retries of the introspection requests.
    #[serde(default)]
    pub http: HttpClientConfig,

    /// Where the merged schema is written.
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "relay-bridge.config.yaml",
    "relay-bridge.config.yml",
    "relay-bridge.config.json",
    "relay-bridge.config.json5",
];

/// Loads the configuration from `override_config_path` (or one of the default
/// file names in the working directory) and applies environment overrides.
/// Every file is optional unless explicitly requested.
pub fn load_config(override_config_path: Option<String>) -> Result<BridgeConfig, BridgeConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<PathBuf>()
            .map_err(BridgeConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<BridgeConfig>()?)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<BridgeConfig, BridgeConfigError> {
    Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<BridgeConfig>()
        .map_err(BridgeConfigError::ConfigLoadError)
}
