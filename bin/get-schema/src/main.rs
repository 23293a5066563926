use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use relay_bridge_cli::{get_schema, logger::configure_logging, GetSchemaError};
use relay_bridge_config::{load_config, BridgeConfig};
use tracing::error;

/// Downloads the relay and simple schemas of a project and saves the relay
/// schema, extended with the subscriptions of the simple one, as SDL.
#[derive(Debug, Parser)]
#[command(name = "get-schema", version)]
struct Args {
    /// Project id used to build both endpoint URLs
    #[arg(value_name = "PROJECT_ID")]
    project_id: Option<String>,

    /// URL of the relay endpoint
    #[arg(long, value_name = "URL")]
    relay: Option<String>,

    /// URL of the simple endpoint
    #[arg(long, value_name = "URL")]
    simple: Option<String>,

    /// Where to write the merged schema
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<String>,

    /// Path to a configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        env = "RELAY_BRIDGE_CONFIG_FILE_PATH"
    )]
    config: Option<String>,
}

impl Args {
    fn apply_to(self, config: &mut BridgeConfig) {
        if let Some(project_id) = self.project_id {
            config.endpoints.project_id = Some(project_id);
        }
        if let Some(relay) = self.relay {
            config.endpoints.relay = Some(relay);
        }
        if let Some(simple) = self.simple {
            config.endpoints.simple = Some(simple);
        }
        if let Some(output) = self.output {
            config.output.path = output;
        }
    }
}

async fn run(mut args: Args) -> Result<PathBuf, GetSchemaError> {
    let mut config = load_config(args.config.take())?;
    args.apply_to(&mut config);
    configure_logging(&config.log);

    get_schema(&config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(_) => ExitCode::SUCCESS,
        // Logging is not configured yet when the config fails to load.
        Err(GetSchemaError::Config(err)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
