//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Arm initial countdown → Apply initial metadata
//!     → Run start script (before or after listener bind, as configured)
//!
//! Shutdown:
//!     Ctrl+C → axum graceful shutdown → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Init actions never abort boot; failures are logged and skipped

pub mod startup;
