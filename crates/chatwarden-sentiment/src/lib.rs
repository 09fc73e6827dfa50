//! ChatWarden Sentiment
//!
//! The reward half of the two-stage screening system: a finite-state
//! pipeline that scores sentiment polarity, classifies community intent,
//! and computes reputation points for messages that passed moderation.
//!
//! Like the moderation pipeline, the entry point is total - a message
//! that cannot be fully analyzed still terminates with a populated
//! (possibly zero-point) reward.

pub mod config;
pub mod pipeline;
pub mod score;
pub mod state;

pub use config::RewardConfig;
pub use pipeline::{SentimentPipeline, SentimentStage};
pub use score::calculate_sentiment_score;
pub use state::{ChatAnalysis, RewardSystem, SentimentState};
