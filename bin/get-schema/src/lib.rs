pub mod endpoints;
pub mod fetcher;
pub mod logger;

use std::path::{Path, PathBuf};
use std::time::Instant;

use relay_bridge::{merge_schemas, print_schema, SchemaMergeError};
use relay_bridge_config::{BridgeConfig, BridgeConfigError};
use tracing::{debug, info};

use crate::{
    endpoints::{resolve_endpoints, EndpointError},
    fetcher::{IntrospectionClient, IntrospectionFetchError},
};

#[derive(Debug, thiserror::Error)]
pub enum GetSchemaError {
    #[error(transparent)]
    Config(#[from] BridgeConfigError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    Fetch(#[from] IntrospectionFetchError),
    #[error("Merging the subscriptions into the relay schema failed: {0}")]
    Merge(#[from] SchemaMergeError),
    #[error("Writing {path} failed: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Downloads both schemas of the configured project, merges the simple
/// schema's subscriptions into the relay schema and writes the result as SDL.
///
/// Returns the path of the written file.
pub async fn get_schema(config: &BridgeConfig) -> Result<PathBuf, GetSchemaError> {
    let started_at = Instant::now();
    let endpoints = resolve_endpoints(&config.endpoints)?;
    let client = IntrospectionClient::new(&config.http)?;

    let (relay, simple) = tokio::try_join!(
        client.fetch_schema(&endpoints.relay),
        client.fetch_schema(&endpoints.simple),
    )?;

    let merged = merge_schemas(relay, simple)?;
    let sdl = print_schema(&merged);
    debug!("printed merged schema with {} types", merged.types.len());

    let path = Path::new(&config.output.path).to_path_buf();
    tokio::fs::write(&path, sdl)
        .await
        .map_err(|source| GetSchemaError::Write {
            path: path.clone(),
            source,
        })?;

    info!(
        "{} has been downloaded and saved in {}",
        path.display(),
        humantime::format_duration(started_at.elapsed())
    );

    Ok(path)
}
