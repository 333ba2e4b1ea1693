//! Instance monitor daemon.
//!
//! Reads a TOML configuration file, performs the one-time init actions
//! (initial countdown, initial metadata, start script), then serves the
//! HTTP control surface until terminated.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use instance_monitor::cloud::CloudClient;
use instance_monitor::config::{self, ScriptOrder};
use instance_monitor::http::HttpServer;
use instance_monitor::lifecycle::startup;
use instance_monitor::observability;
use instance_monitor::shutdown::{ShutdownController, TimerRegistry};

#[derive(Parser, Debug)]
#[command(name = "instmonitord")]
#[command(about = "Monitor daemon for a self-terminating cloud instance")]
struct Args {
    /// Path to the configuration file
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let args = Args::parse();
    let config = config::load_config(&args.config)?;

    // The config file carries credentials; the operator can ask for it to
    // be removed once loaded.
    if config.delete_config {
        match std::fs::remove_file(&args.config) {
            Ok(()) => tracing::info!(path = %args.config.display(), "deleted configuration file"),
            Err(error) => {
                tracing::warn!(error = %error, path = %args.config.display(), "failed to delete configuration file");
            }
        }
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        countdown = config.init.countdown,
        "Configuration loaded"
    );

    let cloud = Arc::new(CloudClient::new(config.cloud.clone())?);
    let controller = Arc::new(ShutdownController::new(TimerRegistry::new(), cloud));

    startup::run_init_sequence(&config.init, &controller).await;

    if let Some(script) = &config.init.start_script {
        if config.init.script_order == ScriptOrder::BeforeListen {
            startup::run_start_script(script).await;
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for control requests"
    );

    if let Some(script) = &config.init.start_script {
        if config.init.script_order == ScriptOrder::AfterListen {
            let script = script.clone();
            tokio::spawn(async move {
                startup::run_start_script(&script).await;
            });
        }
    }

    let server = HttpServer::new(&config.server, controller);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
