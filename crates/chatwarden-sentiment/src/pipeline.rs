//! The sentiment and reward stage graph
//!
//! Four stages run as an explicit finite-state pipeline over one
//! [`SentimentState`]: content-length gating, sentiment scoring,
//! community-intent classification, and reward computation. The run is
//! total and always terminates with a populated reward.

use chatwarden_core::{ChatMessage, CommunityIntent};
use chatwarden_oracles::{PolicyJudge, TextClassifier};
use std::sync::Arc;

use crate::config::RewardConfig;
use crate::score::calculate_sentiment_score;
use crate::state::{RewardSystem, SentimentState};

/// Reward reason when nothing earned or lost points
const NO_POINTS_REASON: &str = "No points awarded";

/// Stages of the sentiment pipeline, in graph order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentStage {
    /// Gate very short messages out of sentiment scoring
    CheckContentLength,
    /// Fetch the sentiment distribution and compute the score
    AnalyzeSentiment,
    /// Classify the message's community intent
    AnalyzeCommunityIntent,
    /// Fold score and intent into awarded points
    CalculateRewards,
}

/// Where a stage sends the run next
enum Transition {
    Next(SentimentStage),
    Done,
}

/// The sentiment pipeline.
///
/// Stateless across runs; safe to share between concurrent messages.
pub struct SentimentPipeline {
    classifier: Arc<dyn TextClassifier>,
    judge: Arc<dyn PolicyJudge>,
    config: RewardConfig,
}

impl SentimentPipeline {
    /// Create a pipeline over the given oracle clients and reward config
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        judge: Arc<dyn PolicyJudge>,
        config: RewardConfig,
    ) -> Self {
        Self {
            classifier,
            judge,
            config,
        }
    }

    /// Analyze one message and compute its reward.
    ///
    /// Total: oracle failures degrade to a zero score and a null intent,
    /// and the reward stage always runs.
    pub async fn run(&self, message: ChatMessage) -> SentimentState {
        let mut state = SentimentState::new(message);
        let mut stage = SentimentStage::CheckContentLength;

        loop {
            match self.step(stage, &mut state).await {
                Transition::Next(next) => stage = next,
                Transition::Done => break,
            }
        }

        state
    }

    /// Transition function: run one stage against the state and name the
    /// next stage, if any
    async fn step(&self, stage: SentimentStage, state: &mut SentimentState) -> Transition {
        match stage {
            SentimentStage::CheckContentLength => self.check_content_length(state),
            SentimentStage::AnalyzeSentiment => self.analyze_sentiment(state).await,
            SentimentStage::AnalyzeCommunityIntent => self.analyze_community_intent(state).await,
            SentimentStage::CalculateRewards => self.calculate_rewards(state),
        }
    }

    fn check_content_length(&self, state: &mut SentimentState) -> Transition {
        let length = state.analysis.message.content.chars().count();

        if length < self.config.min_content_length {
            tracing::debug!(
                message_id = %state.analysis.message.message_id,
                length,
                "message too short for sentiment scoring"
            );
            state.analysis.sentiment_score = Some(0);
            return Transition::Next(SentimentStage::AnalyzeCommunityIntent);
        }

        Transition::Next(SentimentStage::AnalyzeSentiment)
    }

    async fn analyze_sentiment(&self, state: &mut SentimentState) -> Transition {
        let scores = self
            .classifier
            .sentiment_scores(&state.analysis.message.content)
            .await;

        let score = calculate_sentiment_score(&scores);
        state.analysis.sentiment_score = Some(score);

        tracing::debug!(
            message_id = %state.analysis.message.message_id,
            score,
            "sentiment scored"
        );

        Transition::Next(SentimentStage::AnalyzeCommunityIntent)
    }

    async fn analyze_community_intent(&self, state: &mut SentimentState) -> Transition {
        let intent = match self
            .judge
            .community_intent(&state.analysis.message.content)
            .await
        {
            // A null intent must carry a null reason, even when the judge
            // says otherwise.
            Ok(intent) => intent.normalized(),
            Err(e) => {
                tracing::warn!(
                    message_id = %state.analysis.message.message_id,
                    error = %e,
                    "community intent judgment failed, assuming no intent"
                );
                state.analysis.error = Some(e.to_string());
                CommunityIntent::default()
            }
        };

        state.analysis.community_intent = Some(intent);
        Transition::Next(SentimentStage::CalculateRewards)
    }

    fn calculate_rewards(&self, state: &mut SentimentState) -> Transition {
        let mut points = 0;
        let mut reasons = Vec::new();

        let sentiment_score = state.analysis.sentiment_score.unwrap_or(0);
        if sentiment_score > self.config.positive_sentiment_threshold {
            points += self.config.positive_sentiment_points;
            reasons.push("Positive sentiment".to_string());
        }

        if let Some(action) = state
            .analysis
            .community_intent
            .as_ref()
            .and_then(|intent| intent.intent)
        {
            if action.is_positive() {
                points += self.config.positive_action_points;
                reasons.push(format!("Positive action: {action}"));
            } else {
                points += self.config.negative_action_points;
                reasons.push(format!("Negative action: {action}"));
            }
        }

        let reason = if reasons.is_empty() {
            NO_POINTS_REASON.to_string()
        } else {
            reasons.join("; ")
        };

        tracing::info!(
            message_id = %state.analysis.message.message_id,
            points,
            reason = %reason,
            "reward computed"
        );

        state.reward = Some(RewardSystem { points, reason });
        Transition::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatwarden_core::{
        CommunityAction, Error, HarmCategory, LabelScore, ModAction, Result, SentimentScores,
    };
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Stub classifier serving a fixed sentiment distribution
    struct StubClassifier {
        sentiment: SentimentScores,
        sentiment_calls: AtomicU32,
    }

    impl StubClassifier {
        fn new(sentiment: SentimentScores) -> Self {
            Self {
                sentiment,
                sentiment_calls: AtomicU32::new(0),
            }
        }

        fn sentiment_calls(&self) -> u32 {
            self.sentiment_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl TextClassifier for StubClassifier {
        async fn extract_entities(&self, _text: &str) -> Vec<LabelScore> {
            Vec::new()
        }

        async fn harm_scores(&self, _text: &str) -> Vec<LabelScore> {
            vec![LabelScore::new("OK", 1.0)]
        }

        async fn sentiment_scores(&self, _text: &str) -> SentimentScores {
            self.sentiment_calls.fetch_add(1, Ordering::Relaxed);
            self.sentiment
        }
    }

    /// Stub judge serving a fixed community-intent reply
    struct StubJudge {
        intent: Result<CommunityIntent>,
    }

    impl StubJudge {
        fn with_intent(action: Option<CommunityAction>, reason: Option<&str>) -> Self {
            Self {
                intent: Ok(CommunityIntent {
                    intent: action,
                    reason: reason.map(String::from),
                }),
            }
        }

        fn failing() -> Self {
            Self {
                intent: Err(Error::oracle("down")),
            }
        }
    }

    #[async_trait]
    impl PolicyJudge for StubJudge {
        async fn pii_sharing_intent(&self, _text: &str) -> Result<bool> {
            Ok(false)
        }

        async fn community_intent(&self, _text: &str) -> Result<CommunityIntent> {
            match &self.intent {
                Ok(intent) => Ok(intent.clone()),
                Err(e) => Err(Error::oracle(e.to_string())),
            }
        }

        async fn moderation_action(
            &self,
            _category: HarmCategory,
            _text: &str,
        ) -> Result<ModAction> {
            Err(Error::oracle("unused"))
        }
    }

    fn message(content: &str) -> ChatMessage {
        ChatMessage::new("msg-1", content, 7)
    }

    fn positive_scores() -> SentimentScores {
        SentimentScores {
            negative: 0.1,
            neutral: 0.1,
            positive: 0.8,
        }
    }

    fn pipeline(
        classifier: Arc<StubClassifier>,
        judge: StubJudge,
        config: RewardConfig,
    ) -> SentimentPipeline {
        SentimentPipeline::new(classifier, Arc::new(judge), config)
    }

    #[tokio::test]
    async fn test_positive_message_earns_sentiment_bonus() {
        let classifier = Arc::new(StubClassifier::new(positive_scores()));
        let p = pipeline(
            classifier,
            StubJudge::with_intent(None, None),
            RewardConfig::default(),
        );

        let state = p.run(message("what a great round, everyone!")).await;

        assert_eq!(state.analysis.sentiment_score, Some(63));
        let reward = state.reward.unwrap();
        assert_eq!(reward.points, 2);
        assert_eq!(reward.reason, "Positive sentiment");
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        // Score exactly at the threshold earns nothing.
        let scores = SentimentScores {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.3,
        };
        let classifier = Arc::new(StubClassifier::new(scores));
        let p = pipeline(
            classifier,
            StubJudge::with_intent(None, None),
            RewardConfig::default(),
        );

        let state = p.run(message("this is fine i suppose")).await;

        assert_eq!(state.analysis.sentiment_score, Some(30));
        let reward = state.reward.unwrap();
        assert_eq!(reward.points, 0);
        assert_eq!(reward.reason, "No points awarded");
    }

    #[tokio::test]
    async fn test_short_message_skips_sentiment_oracle() {
        let classifier = Arc::new(StubClassifier::new(positive_scores()));
        let p = pipeline(
            classifier.clone(),
            StubJudge::with_intent(None, None),
            RewardConfig::default(),
        );

        let state = p.run(message("gg")).await;

        assert_eq!(state.analysis.sentiment_score, Some(0));
        assert_eq!(classifier.sentiment_calls(), 0);
        assert!(state.reward.is_some());
    }

    #[tokio::test]
    async fn test_positive_action_earns_points() {
        let classifier = Arc::new(StubClassifier::new(positive_scores()));
        let p = pipeline(
            classifier,
            StubJudge::with_intent(
                Some(CommunityAction::HelpfulAdvice),
                Some("offered a build guide"),
            ),
            RewardConfig::default(),
        );

        let state = p.run(message("try upgrading your pickaxe first")).await;

        let reward = state.reward.unwrap();
        assert_eq!(reward.points, 12);
        assert_eq!(
            reward.reason,
            "Positive sentiment; Positive action: HELPFUL_ADVICE"
        );
    }

    #[tokio::test]
    async fn test_negative_action_costs_points() {
        let neutral = SentimentScores::all_neutral();
        let classifier = Arc::new(StubClassifier::new(neutral));
        let p = pipeline(
            classifier,
            StubJudge::with_intent(Some(CommunityAction::Trolling), Some("rage bait")),
            RewardConfig::default(),
        );

        let state = p.run(message("nobody wants you on this server")).await;

        let reward = state.reward.unwrap();
        assert_eq!(reward.points, -10);
        assert_eq!(reward.reason, "Negative action: TROLLING");
    }

    #[tokio::test]
    async fn test_null_intent_drops_reason() {
        let classifier = Arc::new(StubClassifier::new(positive_scores()));
        // Judge violates the invariant; the pipeline repairs it.
        let p = pipeline(
            classifier,
            StubJudge::with_intent(None, Some("stray explanation")),
            RewardConfig::default(),
        );

        let state = p.run(message("hello hello hello")).await;

        let intent = state.analysis.community_intent.unwrap();
        assert!(intent.intent.is_none());
        assert!(intent.reason.is_none());
    }

    #[tokio::test]
    async fn test_judge_failure_yields_null_intent() {
        let classifier = Arc::new(StubClassifier::new(SentimentScores::all_neutral()));
        let p = pipeline(classifier, StubJudge::failing(), RewardConfig::default());

        let state = p.run(message("anyone around tonight?")).await;

        let intent = state.analysis.community_intent.unwrap();
        assert!(intent.intent.is_none());
        assert!(intent.reason.is_none());
        assert!(state.analysis.error.is_some());

        let reward = state.reward.unwrap();
        assert_eq!(reward.points, 0);
        assert_eq!(reward.reason, "No points awarded");
    }

    #[tokio::test]
    async fn test_all_neutral_fallback_scores_zero() {
        // A failing classifier client substitutes the all-neutral
        // distribution; the run still completes with zero points.
        let classifier = Arc::new(StubClassifier::new(SentimentScores::all_neutral()));
        let p = pipeline(classifier, StubJudge::failing(), RewardConfig::default());

        let state = p.run(message("completely ambiguous words")).await;

        assert_eq!(state.analysis.sentiment_score, Some(0));
        assert_eq!(state.reward.unwrap().points, 0);
    }

    #[tokio::test]
    async fn test_custom_gate_length() {
        let classifier = Arc::new(StubClassifier::new(positive_scores()));
        let config = RewardConfig {
            min_content_length: 20,
            ..RewardConfig::default()
        };
        let p = pipeline(
            classifier.clone(),
            StubJudge::with_intent(None, None),
            config,
        );

        let state = p.run(message("nice one!")).await;

        assert_eq!(state.analysis.sentiment_score, Some(0));
        assert_eq!(classifier.sentiment_calls(), 0);
        assert!(state.reward.is_some());
    }
}
