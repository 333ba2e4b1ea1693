//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor
//! daemon. All types derive Serde traits for deserialization from the TOML
//! config file; every section has defaults so minimal configs parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the instance monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Control surface listener settings.
    pub server: ServerConfig,

    /// Cloud provider API settings and credentials.
    pub cloud: CloudConfig,

    /// One-time actions performed at startup.
    pub init: InitConfig,

    /// Delete the configuration file after a successful load.
    pub delete_config: bool,
}

/// Control surface listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds for the control surface.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Cloud provider API configuration.
///
/// Tokens come from `{auth_url}/tokens`, instances live under
/// `{compute_url}/{tenant_id}/servers/{instance_id}`, and the instance reads
/// its own identity from the link-local metadata document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudConfig {
    /// API username.
    pub username: String,

    /// API password.
    pub password: String,

    /// Tenant (project) identifier.
    pub tenant_id: String,

    /// Identity service base URL (token endpoint is `{auth_url}/tokens`).
    pub auth_url: String,

    /// Compute service base URL.
    pub compute_url: String,

    /// Instance metadata document URL.
    pub metadata_url: String,

    /// Timeout in seconds for provider API calls.
    pub request_timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            tenant_id: String::new(),
            auth_url: String::new(),
            compute_url: String::new(),
            metadata_url: default_metadata_url(),
            request_timeout_secs: 10,
        }
    }
}

fn default_metadata_url() -> String {
    "http://169.254.169.254/openstack/2012-08-10/meta_data.json".to_string()
}

/// One-time startup actions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InitConfig {
    /// Initial shutdown countdown in seconds; -1 skips arming.
    pub countdown: i64,

    /// Metadata entries applied to the instance at startup.
    pub metadata: BTreeMap<String, String>,

    /// Optional shell command to run once at startup.
    pub start_script: Option<String>,

    /// Whether the start script runs before or after the listener binds.
    pub script_order: ScriptOrder,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            countdown: -1,
            metadata: BTreeMap::new(),
            start_script: None,
            script_order: ScriptOrder::AfterListen,
        }
    }
}

/// Ordering of the start script relative to the listener bind.
///
/// Downstream tooling may depend on the instance being reachable only after
/// the script completes, or only after listening begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScriptOrder {
    /// Run the script to completion, then bind the listener.
    BeforeListen,
    /// Bind the listener, then run the script in the background.
    #[default]
    AfterListen,
}
