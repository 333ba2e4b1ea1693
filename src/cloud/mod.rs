//! Cloud provider integration.
//!
//! # Data Flow
//! ```text
//! shutdown::controller
//!     → client.rs (authenticate → resolve identity → delete / set metadata)
//!     → provider HTTP APIs (identity service, metadata document, compute)
//! ```
//!
//! # Design Decisions
//! - Fail-fast collaborator: bounded request timeout, no retries
//! - Tokens are fetched per action, never cached
//! - Errors follow the caller-facing taxonomy: Auth / Identity / Api

pub mod client;
pub mod types;

pub use client::CloudClient;
pub use types::{CloudError, CloudResult, InstanceId, Token};
