//! Provider-specific types and error definitions.

use thiserror::Error;

/// Scoped authentication token for strong typing.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(pub String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&"<redacted>").finish()
    }
}

/// Identifier of the compute instance this process runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceId(pub String);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Errors that can occur while talking to the cloud provider.
#[derive(Debug, Error)]
pub enum CloudError {
    /// Credentials rejected or the auth endpoint unreachable.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The instance's own identity could not be resolved.
    #[error("instance identity unresolvable: {0}")]
    Identity(String),

    /// The compute API rejected a delete or metadata call.
    #[error("provider API error: {0}")]
    Api(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client initialization failed: {0}")]
    Client(String),
}

/// Result type for provider operations.
pub type CloudResult<T> = Result<T, CloudError>;
