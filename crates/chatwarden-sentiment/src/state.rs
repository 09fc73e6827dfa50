//! Sentiment pipeline state record

use chatwarden_core::{ChatMessage, CommunityIntent};
use serde::{Deserialize, Serialize};

/// Per-message sentiment analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnalysis {
    /// The analyzed message
    pub message: ChatMessage,

    /// Sentiment polarity in [-100, 100]; absent until computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<i32>,

    /// Community intent classification, once that stage has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_intent: Option<CommunityIntent>,

    /// Best-effort error note if part of the analysis degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatAnalysis {
    /// Create an empty analysis for one message
    pub fn new(message: ChatMessage) -> Self {
        Self {
            message,
            sentiment_score: None,
            community_intent: None,
            error: None,
        }
    }
}

/// Points awarded for one message and the reasons they were earned.
///
/// Zero points is a valid, non-error outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardSystem {
    /// Net points awarded; may be negative
    pub points: i64,

    /// Semicolon-joined reason list, or "No points awarded"
    pub reason: String,
}

/// Aggregate state for one sentiment pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentState {
    /// Analysis results accumulated by the stages
    pub analysis: ChatAnalysis,

    /// Reward computed by the terminal stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<RewardSystem>,
}

impl SentimentState {
    /// Create a fresh state for one pipeline run
    pub fn new(message: ChatMessage) -> Self {
        Self {
            analysis: ChatAnalysis::new(message),
            reward: None,
        }
    }
}
