//! The message screening service
//!
//! Chains the two pipelines: every message is moderated first; messages
//! with a benign or warning-only disposition continue through sentiment
//! analysis, and the resulting reward is folded into the score ledger.

use chatwarden_core::{ActionKind, ChatMessage, Result};
use chatwarden_moderation::{ModerationPipeline, ModerationState};
use chatwarden_oracles::{
    HttpPolicyJudge, HttpTextClassifier, PolicyJudge, TextClassifier,
};
use chatwarden_scoring::ScoreLedger;
use chatwarden_sentiment::{SentimentPipeline, SentimentState};
use serde::Serialize;
use std::sync::Arc;

use crate::config::WardenConfig;

/// Combined outcome of screening one message
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    /// The moderation disposition
    pub moderation: ModerationState,

    /// Sentiment and reward results, when the message passed moderation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentState>,
}

/// Screens chat messages end to end.
///
/// Stateless apart from the shared score ledger; safe to share across
/// concurrent message handlers.
pub struct ChatScreeningService {
    moderation: ModerationPipeline,
    sentiment: SentimentPipeline,
    ledger: Arc<ScoreLedger>,
}

impl ChatScreeningService {
    /// Create a service over the given oracle clients and ledger
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        judge: Arc<dyn PolicyJudge>,
        config: &WardenConfig,
        ledger: Arc<ScoreLedger>,
    ) -> Self {
        Self {
            moderation: ModerationPipeline::new(Arc::clone(&classifier), Arc::clone(&judge)),
            sentiment: SentimentPipeline::new(classifier, judge, config.rewards.clone()),
            ledger,
        }
    }

    /// Create a service with HTTP oracle clients built from configuration
    pub fn from_config(config: &WardenConfig, ledger: Arc<ScoreLedger>) -> Result<Self> {
        let classifier = Arc::new(HttpTextClassifier::new(config.classifier.clone())?);
        let judge = Arc::new(HttpPolicyJudge::new(config.judge.clone())?);

        Ok(Self::new(classifier, judge, config, ledger))
    }

    /// Screen one message: moderate, then score sentiment and award
    /// points if moderation passed. Total; never fails.
    pub async fn screen_message(&self, message: ChatMessage) -> ScreeningOutcome {
        metrics::counter!("chatwarden_messages_screened_total").increment(1);

        let moderation = self.moderation.run(message.clone()).await;

        if !passes_moderation(&moderation) {
            metrics::counter!("chatwarden_messages_blocked_total").increment(1);

            tracing::info!(
                message_id = %message.message_id,
                action = ?moderation.action.as_ref().map(|a| a.action),
                "message blocked, skipping sentiment"
            );
            return ScreeningOutcome {
                moderation,
                sentiment: None,
            };
        }

        let sentiment = self.sentiment.run(message.clone()).await;

        if let Some(reward) = &sentiment.reward {
            self.ledger
                .record_reward(message.user_id, message.user_name.as_deref(), reward.points);
        }

        ScreeningOutcome {
            moderation,
            sentiment: Some(sentiment),
        }
    }

    /// The shared score ledger backing this service
    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }
}

/// Whether a moderation disposition lets the message continue to the
/// reward pipeline: benign runs and warning-only fallbacks pass,
/// anything stronger blocks.
fn passes_moderation(state: &ModerationState) -> bool {
    match &state.action {
        None => true,
        Some(action) => action.action == ActionKind::Warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwarden_core::ModAction;

    fn state_with(action: Option<ModAction>) -> ModerationState {
        let mut state = ModerationState::new(ChatMessage::new("m", "text", 1));
        state.action = action;
        state
    }

    #[test]
    fn test_benign_passes() {
        assert!(passes_moderation(&state_with(None)));
    }

    #[test]
    fn test_warning_passes() {
        assert!(passes_moderation(&state_with(Some(ModAction::new(
            ActionKind::Warning,
            "manual review"
        )))));
    }

    #[test]
    fn test_stronger_actions_block() {
        for kind in [
            ActionKind::Mute,
            ActionKind::Kick,
            ActionKind::Ban,
            ActionKind::DeleteMessage,
            ActionKind::AccountRestriction,
        ] {
            assert!(!passes_moderation(&state_with(Some(ModAction::new(
                kind, "blocked"
            )))));
        }
    }
}
