use relay_bridge::{IntrospectionResponse, IntrospectionSchema, INTROSPECTION_QUERY};
use relay_bridge_config::http_client::HttpClientConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use retry_policies::policies::ExponentialBackoff;
use tracing::{debug, trace};

const JSON_CONTENT_TYPE: &str = "application/json";
const USER_AGENT: &str = concat!("relay-bridge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum IntrospectionFetchError {
    #[error("Creating HTTP Client failed: {0}")]
    HTTPClientCreation(reqwest::Error),
    #[error("Encoding the introspection request failed: {0}")]
    RequestEncode(serde_json::Error),
    #[error("Network error while fetching {endpoint}: {source}")]
    Network {
        endpoint: String,
        source: reqwest_middleware::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("Reading the response of {endpoint} failed: {source}")]
    ResponseRead {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("Parsing the introspection response of {endpoint} failed: {source}")]
    ResponseParse {
        endpoint: String,
        source: serde_json::Error,
    },
    #[error("{endpoint} returned errors: {}", .messages.join(", "))]
    GraphQLErrors {
        endpoint: String,
        messages: Vec<String>,
    },
    #[error("{0} returned no __schema")]
    MissingSchema(String),
}

/// Runs the introspection query against GraphQL endpoints.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    client: ClientWithMiddleware,
    request_body: Vec<u8>,
}

impl IntrospectionClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, IntrospectionFetchError> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retry_count);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let reqwest_agent = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(IntrospectionFetchError::HTTPClientCreation)?;
        let client = ClientBuilder::new(reqwest_agent)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let request_body = serde_json::to_vec(&serde_json::json!({ "query": INTROSPECTION_QUERY }))
            .map_err(IntrospectionFetchError::RequestEncode)?;

        Ok(Self {
            client,
            request_body,
        })
    }

    pub async fn fetch_schema(
        &self,
        endpoint: &str,
    ) -> Result<IntrospectionSchema, IntrospectionFetchError> {
        debug!("introspecting {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .body(self.request_body.clone())
            .send()
            .await
            .map_err(|source| IntrospectionFetchError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(IntrospectionFetchError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| IntrospectionFetchError::ResponseRead {
                endpoint: endpoint.to_string(),
                source,
            })?;
        trace!("received {} bytes from {}", body.len(), endpoint);

        let response: IntrospectionResponse =
            serde_json::from_slice(&body).map_err(|source| {
                IntrospectionFetchError::ResponseParse {
                    endpoint: endpoint.to_string(),
                    source,
                }
            })?;

        if !response.errors.is_empty() {
            return Err(IntrospectionFetchError::GraphQLErrors {
                endpoint: endpoint.to_string(),
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        let schema = response
            .into_schema()
            .ok_or_else(|| IntrospectionFetchError::MissingSchema(endpoint.to_string()))?;
        debug!(
            "introspected {} types from {}",
            schema.types.len(),
            endpoint
        );

        Ok(schema)
    }
}

/// Client settings for tests: no retries and short timeouts.
#[cfg(test)]
pub(crate) fn test_http_config() -> HttpClientConfig {
    HttpClientConfig {
        connect_timeout: std::time::Duration::from_secs(1),
        request_timeout: std::time::Duration::from_secs(5),
        retry_count: 0,
    }
}
