//! Self-termination scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! control surface / init sequence
//!     → controller.rs (add / cancelAll / list / setMetadata)
//!     → registry.rs (single-slot timer, fire-guard)
//!     → cloud client (terminate or tag the instance)
//! ```
//!
//! # Design Decisions
//! - At most one timer is ever pending or executing; the registry enforces it
//! - The registry and the provider client are constructed state passed into
//!   the controller, never ambient globals
//! - Timer state lives in memory only; nothing survives a restart

pub mod controller;
pub mod registry;

pub use controller::ShutdownController;
pub use registry::{ArmError, TimerRegistry, TimerStatus};
