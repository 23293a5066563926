use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

use crate::log::{LogFormat, LogLevel};

#[derive(Envconfig, Default)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Endpoint overrides
    #[envconfig(from = "RELAY_ENDPOINT")]
    pub relay_endpoint: Option<String>,
    #[envconfig(from = "SIMPLE_ENDPOINT")]
    pub simple_endpoint: Option<String>,
    #[envconfig(from = "PROJECT_ID")]
    pub project_id: Option<String>,

    // Output overrides
    #[envconfig(from = "SCHEMA_OUTPUT_PATH")]
    pub output_path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            let log_level: &'static str = log_level.into();
            config = config.set_override("log.level", log_level)?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            let log_format: &'static str = log_format.into();
            config = config.set_override("log.format", log_format)?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(relay_endpoint) = self.relay_endpoint.take() {
            debug!("[config-override] 'endpoints.relay' = {}", relay_endpoint);
            config = config.set_override("endpoints.relay", relay_endpoint)?;
        }
        if let Some(simple_endpoint) = self.simple_endpoint.take() {
            debug!("[config-override] 'endpoints.simple' = {}", simple_endpoint);
            config = config.set_override("endpoints.simple", simple_endpoint)?;
        }
        if let Some(project_id) = self.project_id.take() {
            debug!("[config-override] 'endpoints.project_id' = {}", project_id);
            config = config.set_override("endpoints.project_id", project_id)?;
        }

        if let Some(output_path) = self.output_path.take() {
            debug!("[config-override] 'output.path' = {}", output_path);
            config = config.set_override("output.path", output_path)?;
        }

        Ok(config)
    }
}
