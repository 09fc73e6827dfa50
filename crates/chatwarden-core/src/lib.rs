//! ChatWarden Core
//!
//! Core types and utilities shared across ChatWarden components.
//!
//! This crate provides:
//! - The immutable chat message record produced by the boundary layer
//! - Category and action enumerations shared by classifiers and pipelines
//! - Structured judge output contracts (moderation action, community intent)
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ActionKind, ChatMessage, CommunityAction, CommunityIntent, HarmCategory, LabelScore,
    ModAction, PiiCategory, SentimentScores,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        ActionKind, ChatMessage, CommunityAction, CommunityIntent, HarmCategory, LabelScore,
        ModAction, PiiCategory, SentimentScores,
    };
}
