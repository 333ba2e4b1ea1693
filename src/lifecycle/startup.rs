//! Startup orchestration.
//!
//! # Responsibilities
//! - Arm the initial countdown from configuration
//! - Apply the initial metadata map
//! - Run the one-time start script in the configured order
//!
//! # Design Decisions
//! - Init failures are logged, never fatal: a countdown or metadata error
//!   must not keep the control surface from coming up
//! - Script ordering relative to the listener bind is preserved as
//!   configured; downstream tooling may depend on either ordering

use tokio::process::Command;

use crate::config::InitConfig;
use crate::shutdown::ShutdownController;

/// Perform the one-time init actions: initial countdown, initial metadata.
///
/// Runs before the listener binds; the start script is handled separately
/// because its ordering depends on `script_order`.
pub async fn run_init_sequence(config: &InitConfig, controller: &ShutdownController) {
    if let Err(error) = controller.add_shutdown(config.countdown) {
        tracing::error!(error = %error, "failed to arm initial countdown");
    }

    for (name, value) in &config.metadata {
        if let Err(error) = controller.set_metadata(name, value).await {
            tracing::error!(name = %name, error = %error, "failed to apply initial metadata");
        }
    }
}

/// Run the configured start script via the shell, logging its outcome.
pub async fn run_start_script(script: &str) {
    tracing::info!(script, "running start script");
    match Command::new("sh").arg("-c").arg(script).status().await {
        Ok(status) if status.success() => {
            tracing::info!("start script finished");
        }
        Ok(status) => {
            tracing::warn!(code = ?status.code(), "start script exited with failure");
        }
        Err(error) => {
            tracing::error!(error = %error, "failed to spawn start script");
        }
    }
}
