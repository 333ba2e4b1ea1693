//! Shutdown controller: binds the timer registry to the provider actions.
//!
//! # Responsibilities
//! - Arm the termination timer (`add_shutdown`)
//! - Cancel and enumerate pending timers
//! - Apply instance metadata on operator request
//!
//! The terminate sequence (authenticate → resolve identity → delete) runs
//! when the timer fires; failures are logged and never retried — the
//! fire-guard has already removed the timer, so a failed attempt leaves the
//! instance running with no timer pending.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::cloud::{CloudClient, CloudResult};
use crate::shutdown::registry::{ArmError, TimerRegistry, TimerStatus};

/// Control operations exposed to the HTTP surface and the init sequence.
pub struct ShutdownController {
    registry: TimerRegistry,
    cloud: Arc<CloudClient>,
}

impl ShutdownController {
    /// Create a controller over an explicit registry and provider client.
    pub fn new(registry: TimerRegistry, cloud: Arc<CloudClient>) -> Self {
        Self { registry, cloud }
    }

    /// Arm a termination timer `timeout_secs` from now.
    ///
    /// A negative timeout means "do not schedule" and is a successful no-op;
    /// callers use it as the default when no countdown is wanted.
    pub fn add_shutdown(&self, timeout_secs: i64) -> Result<Option<TimerStatus>, ArmError> {
        if timeout_secs < 0 {
            tracing::debug!(timeout_secs, "negative timeout, not scheduling");
            return Ok(None);
        }

        let cloud = self.cloud.clone();
        let status = self.registry.arm(
            Duration::from_secs(timeout_secs as u64),
            move || async move { terminate_instance(&cloud).await },
        )?;
        tracing::info!(timer = %status.id, timeout_secs, "armed shutdown timer");
        Ok(Some(status))
    }

    /// Cancel every pending shutdown; returns how many were cancelled.
    pub fn cancel_all_shutdowns(&self) -> usize {
        let cancelled = self.registry.cancel_all();
        tracing::info!(cancelled, "cancel all shutdowns");
        cancelled
    }

    /// Snapshot of the pending shutdown timers.
    pub fn list_shutdowns(&self) -> Vec<TimerStatus> {
        self.registry.list()
    }

    /// Render the pending timers as a text block per entry, matching the
    /// control surface's list output.
    pub fn render_shutdowns(&self) -> String {
        let mut output = String::new();
        for timer in self.list_shutdowns() {
            let start: DateTime<Local> = timer.armed_at.into();
            let end: DateTime<Local> = timer.fires_at().into();
            output.push_str("--------------\n");
            output.push_str(&format!("Start    : {}\n", start.format("%d %b %Y %H:%M:%S")));
            output.push_str(&format!("End      : {}\n", end.format("%d %b %Y %H:%M:%S")));
            output.push_str(&format!("Remaining: {} min\n", timer.remaining.as_secs() / 60));
        }
        output
    }

    /// Set one metadata entry on this instance.
    ///
    /// An empty name is a successful no-op. The call is not queued or
    /// retried; transient failures surface to the caller.
    pub async fn set_metadata(&self, name: &str, value: &str) -> CloudResult<()> {
        if name.is_empty() {
            tracing::debug!("ignoring metadata request with empty name");
            return Ok(());
        }

        let token = self.cloud.authenticate().await?;
        let instance = self.cloud.resolve_instance().await?;
        self.cloud
            .set_instance_metadata(&token, &instance, name, value)
            .await?;
        tracing::info!(name, "instance metadata updated");
        Ok(())
    }
}

/// The armed action: authenticate, resolve this instance, request deletion.
///
/// Runs outside the registry lock; by the time it executes the timer is
/// already removed, so an error here is terminal for this attempt.
async fn terminate_instance(cloud: &CloudClient) {
    let result = async {
        let token = cloud.authenticate().await?;
        let instance = cloud.resolve_instance().await?;
        cloud.delete_instance(&token, &instance).await?;
        Ok::<_, crate::cloud::CloudError>(instance)
    }
    .await;

    match result {
        Ok(instance) => {
            tracing::info!(instance = %instance, "instance termination requested");
        }
        Err(error) => {
            tracing::error!(error = %error, "instance termination failed");
        }
    }
}

impl std::fmt::Debug for ShutdownController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownController")
            .field("registry", &self.registry)
            .field("cloud", &self.cloud)
            .finish()
    }
}
