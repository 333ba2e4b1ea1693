//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the cloud endpoints are usable URLs
//! - Validate value ranges (timeouts > 0, countdown >= -1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("not a valid socket address: {:?}", config.server.bind_address),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    for (field, value) in [
        ("cloud.username", &config.cloud.username),
        ("cloud.tenant_id", &config.cloud.tenant_id),
    ] {
        if value.is_empty() {
            errors.push(ValidationError {
                field,
                message: "must not be empty".to_string(),
            });
        }
    }
    for (field, value) in [
        ("cloud.auth_url", &config.cloud.auth_url),
        ("cloud.compute_url", &config.cloud.compute_url),
        ("cloud.metadata_url", &config.cloud.metadata_url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(ValidationError {
                field,
                message: format!("not a valid URL: {value:?}"),
            });
        }
    }
    if config.cloud.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "cloud.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.init.countdown < -1 {
        errors.push(ValidationError {
            field: "init.countdown",
            message: format!("must be >= -1, got {}", config.init.countdown),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MonitorConfig;

    fn valid_config() -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.cloud.username = "monitor".into();
        config.cloud.password = "secret".into();
        config.cloud.tenant_id = "tenant-1".into();
        config.cloud.auth_url = "https://identity.example.net/v2.0".into();
        config.cloud.compute_url = "https://compute.example.net/v2".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.cloud.auth_url = "not a url".into();
        config.init.countdown = -2;
        config.server.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "cloud.auth_url"));
        assert!(errors.iter().any(|e| e.field == "init.countdown"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut config = valid_config();
        config.cloud.username = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "cloud.username"));
    }
}
