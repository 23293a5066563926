use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EndpointsConfig {
    /// URL of the relay (edge/node paginated) GraphQL endpoint.
    ///
    /// When omitted, it is derived from `simple` by swapping the `/simple/` path segment for `/relay/`,
    /// or built from `base_url` and `project_id`.
    ///
    /// Can also be set via the `RELAY_ENDPOINT` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<String>,

    /// URL of the simple GraphQL endpoint, the one serving subscriptions.
    ///
    /// When omitted, it is derived from `relay` by swapping the `/relay/` path segment for `/simple/`,
    /// or built from `base_url` and `project_id`.
    ///
    /// Can also be set via the `SIMPLE_ENDPOINT` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<String>,

    /// Project identifier used to build both endpoint URLs (`{base_url}/{relay|simple}/{project_id}`).
    ///
    /// Can also be set via the `PROJECT_ID` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Base URL the endpoints are built from when only a project id is known.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            relay: None,
            simple: None,
            project_id: None,
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.graph.cool".to_string()
}
