//! Cloud provider API client with timeout and error handling.
//!
//! # Responsibilities
//! - Obtain a scoped token from the identity service
//! - Resolve this instance's identity from the metadata document
//! - Request instance deletion
//! - Set instance metadata entries
//!
//! Calls are fail-fast: a bounded request timeout, no retries, no failover.

use std::time::Duration;

use serde::Deserialize;

use crate::cloud::types::{CloudError, CloudResult, InstanceId, Token};
use crate::config::CloudConfig;

/// Client for the provider's identity, metadata, and compute APIs.
#[derive(Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    config: CloudConfig,
}

#[derive(Deserialize)]
struct AuthResponse {
    access: Access,
}

#[derive(Deserialize)]
struct Access {
    token: TokenEntry,
}

#[derive(Deserialize)]
struct TokenEntry {
    id: String,
}

#[derive(Deserialize)]
struct MetadataDocument {
    uuid: String,
}

impl CloudClient {
    /// Create a new client from configuration.
    pub fn new(config: CloudConfig) -> CloudResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CloudError::Client(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Obtain a scoped token from the identity service.
    pub async fn authenticate(&self) -> CloudResult<Token> {
        let url = format!("{}/tokens", self.config.auth_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "auth": {
                "passwordCredentials": {
                    "username": self.config.username,
                    "password": self.config.password,
                },
                "tenantId": self.config.tenant_id,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CloudError::Auth(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CloudError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| CloudError::Auth(format!("malformed token response: {e}")))?;
        tracing::debug!("obtained scoped token");
        Ok(Token(auth.access.token.id))
    }

    /// Resolve this instance's identity from the metadata document.
    pub async fn resolve_instance(&self) -> CloudResult<InstanceId> {
        let response = self
            .http
            .get(&self.config.metadata_url)
            .send()
            .await
            .map_err(|e| CloudError::Identity(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CloudError::Identity(format!(
                "metadata document returned {}",
                response.status()
            )));
        }

        let document: MetadataDocument = response
            .json()
            .await
            .map_err(|e| CloudError::Identity(format!("malformed metadata document: {e}")))?;
        Ok(InstanceId(document.uuid))
    }

    /// Request deletion of the given instance.
    pub async fn delete_instance(&self, token: &Token, instance: &InstanceId) -> CloudResult<()> {
        let url = self.server_url(instance);
        let response = self
            .http
            .delete(&url)
            .header("X-Auth-Token", token.as_str())
            .send()
            .await
            .map_err(|e| CloudError::Api(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CloudError::Api(format!(
                "delete of instance {} returned {}",
                instance,
                response.status()
            )));
        }
        Ok(())
    }

    /// Set a single metadata entry on the given instance.
    pub async fn set_instance_metadata(
        &self,
        token: &Token,
        instance: &InstanceId,
        name: &str,
        value: &str,
    ) -> CloudResult<()> {
        let url = format!("{}/metadata", self.server_url(instance));
        let mut entry = serde_json::Map::new();
        entry.insert(name.to_string(), serde_json::Value::String(value.to_string()));
        let body = serde_json::json!({ "metadata": entry });

        let response = self
            .http
            .post(&url)
            .header("X-Auth-Token", token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| CloudError::Api(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CloudError::Api(format!(
                "metadata update on instance {} returned {}",
                instance,
                response.status()
            )));
        }
        Ok(())
    }

    fn server_url(&self, instance: &InstanceId) -> String {
        format!(
            "{}/{}/servers/{}",
            self.config.compute_url.trim_end_matches('/'),
            self.config.tenant_id,
            instance
        )
    }
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("auth_url", &self.config.auth_url)
            .field("compute_url", &self.config.compute_url)
            .field("tenant_id", &self.config.tenant_id)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}
