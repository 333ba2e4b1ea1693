//! HTTP control surface subsystem.
//!
//! # Data Flow
//! ```text
//! operator request
//!     → server.rs (Axum setup, middleware: timeout, request ID, trace)
//!     → handlers.rs (argument parsing with defaults, status mapping)
//!     → shutdown::ShutdownController
//! ```
//!
//! # Design Decisions
//! - No authentication: the surface is assumed reachable only by the
//!   instance's operator (original daemon contract)
//! - Malformed arguments are rejected at extraction, before any state change
//! - Cloud collaborator failures map to 502, an armed conflict to 409

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
