//! Reward and gating configuration
//!
//! The gating threshold and point values drifted across revisions of the
//! upstream system, so they are deliberate configuration here rather
//! than hard-coded constants.

use serde::{Deserialize, Serialize};

/// Configuration for the sentiment pipeline's gating and reward stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Messages shorter than this skip sentiment scoring (score 0)
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Sentiment score must be strictly greater than this to earn the
    /// positive-sentiment bonus
    #[serde(default = "default_positive_sentiment_threshold")]
    pub positive_sentiment_threshold: i32,

    /// Points for a clearly positive message
    #[serde(default = "default_positive_sentiment_points")]
    pub positive_sentiment_points: i64,

    /// Points for a positive community action
    #[serde(default = "default_positive_action_points")]
    pub positive_action_points: i64,

    /// Points (negative) for a negative community action
    #[serde(default = "default_negative_action_points")]
    pub negative_action_points: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            min_content_length: default_min_content_length(),
            positive_sentiment_threshold: default_positive_sentiment_threshold(),
            positive_sentiment_points: default_positive_sentiment_points(),
            positive_action_points: default_positive_action_points(),
            negative_action_points: default_negative_action_points(),
        }
    }
}

fn default_min_content_length() -> usize {
    5
}

fn default_positive_sentiment_threshold() -> i32 {
    30
}

fn default_positive_sentiment_points() -> i64 {
    2
}

fn default_positive_action_points() -> i64 {
    10
}

fn default_negative_action_points() -> i64 {
    -10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RewardConfig::default();
        assert_eq!(config.min_content_length, 5);
        assert_eq!(config.positive_sentiment_threshold, 30);
        assert_eq!(config.positive_sentiment_points, 2);
        assert_eq!(config.positive_action_points, 10);
        assert_eq!(config.negative_action_points, -10);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: RewardConfig = serde_json::from_str(r#"{"min_content_length": 20}"#).unwrap();
        assert_eq!(config.min_content_length, 20);
        assert_eq!(config.positive_sentiment_threshold, 30);
    }
}
