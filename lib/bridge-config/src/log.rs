use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Crates whose diagnostics follow `log.level`. Everything else, HTTP and TLS
/// internals included, only reports warnings and errors.
const TOOL_TARGETS: [&str; 3] = ["relay_bridge", "relay_bridge_cli", "relay_bridge_config"];

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Verbosity of the schema download.
    ///
    /// Can also be set via the `LOG_LEVEL` environment variable.
    #[serde(default)]
    pub level: LogLevel,

    /// How log lines are rendered on stderr.
    ///
    /// Can also be set via the `LOG_FORMAT` environment variable.
    #[serde(default)]
    pub format: LogFormat,

    /// Raw `EnvFilter` directives, replacing the ones derived from `level`.
    ///
    /// Can also be set via the `LOG_FILTER` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn filter_directives(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }

        let level: &'static str = self.level.into();
        let dependencies_level: &'static str = LogLevel::Warn.into();
        let mut directives = vec![dependencies_level.to_string()];
        directives.extend(
            TOOL_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level)),
        );
        directives.join(",")
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    JsonSchema,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    JsonSchema,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Indented span tree, for reading a single run.
    PrettyTree,
    /// One line per event.
    #[default]
    PrettyCompact,
    /// One JSON object per event, for CI logs.
    Json,
}
