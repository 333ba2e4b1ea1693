//! Instance Monitor — self-termination scheduler for a cloud instance.
//!
//! A single-process control service that arms a delayed "terminate this
//! instance" action, lets it be cancelled or listed while pending, and tags
//! the instance with operator-supplied metadata.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────┐
//!                   │                INSTANCE MONITOR                │
//!                   │                                                │
//!  Operator Request │  ┌─────────┐     ┌─────────────────────┐      │
//!  ─────────────────┼─▶│  http   │────▶│ shutdown controller │      │
//!                   │  │ surface │     └──────┬───────┬──────┘      │
//!                   │  └─────────┘            │       │             │
//!                   │                         ▼       ▼             │
//!                   │               ┌──────────┐  ┌───────────┐     │
//!                   │               │  timer   │  │   cloud   │─────┼──▶ Provider API
//!                   │               │ registry │  │  client   │     │    (auth, identity,
//!                   │               └──────────┘  └───────────┘     │     delete, metadata)
//!                   │                                                │
//!                   │  ┌──────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns          │ │
//!                   │  │ ┌────────┐ ┌───────────┐ ┌─────────────┐ │ │
//!                   │  │ │ config │ │ lifecycle │ │observability│ │ │
//!                   │  │ └────────┘ └───────────┘ └─────────────┘ │ │
//!                   │  └──────────────────────────────────────────┘ │
//!                   └────────────────────────────────────────────────┘
//! ```
//!
//! The timer registry holds at most one pending termination; arming,
//! listing, cancelling, and the fire-guard are mutually exclusive, and a
//! cancel that completes before the deadline guarantees the terminate action
//! never runs.

pub mod cloud;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod shutdown;

pub use config::schema::MonitorConfig;
pub use http::HttpServer;
pub use shutdown::{ShutdownController, TimerRegistry};
