//! ChatWarden Engine
//!
//! Ties the screening system together: configuration loading, the
//! moderation-then-sentiment chain, and the fold of rewards into the
//! shared score ledger. The HTTP boundary layer sits above this crate
//! and only ever sees total entry points.

pub mod config;
pub mod service;

pub use config::WardenConfig;
pub use service::{ChatScreeningService, ScreeningOutcome};
