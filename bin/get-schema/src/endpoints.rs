use std::fmt::Display;

use relay_bridge_config::endpoints::EndpointsConfig;
use tracing::debug;
use url::Url;

/// Browsers refuse URLs of this length and above.
const MAX_URL_LENGTH: usize = 2083;
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Relay,
    Simple,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Relay => "relay",
            EndpointKind::Simple => "simple",
        }
    }

    fn counterpart(&self) -> EndpointKind {
        match self {
            EndpointKind::Relay => EndpointKind::Simple,
            EndpointKind::Simple => EndpointKind::Relay,
        }
    }

    fn path_segment(&self) -> String {
        format!("/{}/", self.as_str())
    }
}

impl Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("unable to determine the {0} endpoint, pass --relay, --simple or a project id")]
    Unresolved(EndpointKind),
    #[error("the {kind} endpoint '{url}' is not a valid URL")]
    InvalidUrl { kind: EndpointKind, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    pub relay: String,
    pub simple: String,
}

/// Turns the endpoint of one API flavour into the endpoint of the other one,
/// by swapping the first `/relay/` or `/simple/` path segment.
pub fn convert_url(url: &str, to: EndpointKind) -> Option<String> {
    let from = to.counterpart().path_segment();

    url.contains(&from)
        .then(|| url.replacen(&from, &to.path_segment(), 1))
}

pub fn construct_url(base_url: &str, kind: EndpointKind, project_id: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), kind, project_id)
}

pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.len() >= MAX_URL_LENGTH {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()) && url.has_host(),
        Err(_) => false,
    }
}

/// An explicit endpoint wins, then the counterpart endpoint converted to this
/// flavour, then an endpoint built from the project id.
fn resolve_endpoint(
    config: &EndpointsConfig,
    kind: EndpointKind,
) -> Result<String, EndpointError> {
    let (explicit, counterpart) = match kind {
        EndpointKind::Relay => (&config.relay, &config.simple),
        EndpointKind::Simple => (&config.simple, &config.relay),
    };

    let endpoint = explicit
        .clone()
        .or_else(|| {
            counterpart
                .as_deref()
                .and_then(|url| convert_url(url, kind))
        })
        .or_else(|| {
            config
                .project_id
                .as_deref()
                .map(|project_id| construct_url(&config.base_url, kind, project_id))
        })
        .ok_or(EndpointError::Unresolved(kind))?;

    if !is_valid_url(&endpoint) {
        return Err(EndpointError::InvalidUrl {
            kind,
            url: endpoint,
        });
    }

    debug!("resolved {} endpoint: {}", kind, endpoint);

    Ok(endpoint)
}

pub fn resolve_endpoints(config: &EndpointsConfig) -> Result<ResolvedEndpoints, EndpointError> {
    Ok(ResolvedEndpoints {
        relay: resolve_endpoint(config, EndpointKind::Relay)?,
        simple: resolve_endpoint(config, EndpointKind::Simple)?,
    })
}
