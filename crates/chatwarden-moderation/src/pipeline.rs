//! The moderation stage graph
//!
//! Four stages run as an explicit finite-state pipeline over one
//! [`ModerationState`]: PII detection, PII-intent check, harm
//! classification, and action selection. Every path terminates - either
//! short-circuiting with a DELETE_MESSAGE, ending benignly with no
//! action, or reaching action selection which always produces an action
//! (judge result or fallback). [`ModerationPipeline::run`] is total and
//! never propagates an error past its boundary.

use chatwarden_core::{ActionKind, ChatMessage, HarmCategory, ModAction, PiiCategory, Result};
use chatwarden_oracles::{default_harm_scores, PolicyJudge, TextClassifier};
use std::sync::Arc;

use crate::state::{ContentResult, ModerationState, PiiResult};

/// Fallback reason when the action judge fails
const MANUAL_REVIEW_REASON: &str = "Automated moderation - manual review required";

/// Fallback reason when the run itself fails unexpectedly
const SYSTEM_ERROR_REASON: &str = "Moderation system error - manual review required";

/// Reason attached when the judge detects PII-sharing intent
const PII_INTENT_REASON: &str = "Potential PII sharing intent detected";

/// Stages of the moderation pipeline, in graph order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStage {
    /// Scan the text for PII entities
    DetectPii,
    /// Judge whether the author intends to share personal information
    CheckIntent,
    /// Score the text against the harm-category taxonomy
    ModerateContent,
    /// Select a remedial action for the dominant harm category
    DetermineAction,
}

/// Where a stage sends the run next
enum Transition {
    Next(ModerationStage),
    Done,
}

/// The moderation pipeline.
///
/// Owns no per-run state; each [`run`](Self::run) works on a fresh
/// [`ModerationState`], so one pipeline can serve concurrent runs.
pub struct ModerationPipeline {
    classifier: Arc<dyn TextClassifier>,
    judge: Arc<dyn PolicyJudge>,
}

impl ModerationPipeline {
    /// Create a pipeline over the given oracle clients
    pub fn new(classifier: Arc<dyn TextClassifier>, judge: Arc<dyn PolicyJudge>) -> Self {
        Self { classifier, judge }
    }

    /// Moderate one message.
    ///
    /// Total: internal failures degrade to documented fallbacks, and an
    /// unexpected error escaping a stage converts to a WARNING action
    /// rather than surfacing.
    pub async fn run(&self, message: ChatMessage) -> ModerationState {
        let mut state = ModerationState::new(message);
        let mut stage = ModerationStage::DetectPii;

        loop {
            match self.step(stage, &mut state).await {
                Ok(Transition::Next(next)) => stage = next,
                Ok(Transition::Done) => break,
                Err(e) => {
                    tracing::error!(
                        message_id = %state.message.message_id,
                        stage = ?stage,
                        error = %e,
                        "moderation run failed, applying warning fallback"
                    );
                    state.action =
                        Some(ModAction::new(ActionKind::Warning, SYSTEM_ERROR_REASON));
                    break;
                }
            }
        }

        state
    }

    /// Transition function: run one stage against the state and name the
    /// next stage, if any
    async fn step(&self, stage: ModerationStage, state: &mut ModerationState) -> Result<Transition> {
        match stage {
            ModerationStage::DetectPii => self.detect_pii(state).await,
            ModerationStage::CheckIntent => self.check_intent(state).await,
            ModerationStage::ModerateContent => self.moderate_content(state).await,
            ModerationStage::DetermineAction => self.determine_action(state).await,
        }
    }

    async fn detect_pii(&self, state: &mut ModerationState) -> Result<Transition> {
        let entities = self.classifier.extract_entities(&state.message.content).await;

        let category = entities
            .iter()
            .find_map(|entity| PiiCategory::parse_label(&entity.label));

        match category {
            Some(category) => {
                state.pii = Some(PiiResult::detected(Some(category)));
                state.action = Some(ModAction::new(
                    ActionKind::DeleteMessage,
                    format!("Detected {category} in message"),
                ));

                tracing::info!(
                    message_id = %state.message.message_id,
                    category = %category,
                    "PII detected, message blocked"
                );
                Ok(Transition::Done)
            }
            None => {
                state.pii = Some(PiiResult::absent());
                Ok(Transition::Next(ModerationStage::CheckIntent))
            }
        }
    }

    async fn check_intent(&self, state: &mut ModerationState) -> Result<Transition> {
        let intent = match self.judge.pii_sharing_intent(&state.message.content).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(
                    message_id = %state.message.message_id,
                    error = %e,
                    "intent judgment failed, assuming no sharing intent"
                );
                false
            }
        };

        match &mut state.pii {
            Some(pii) => pii.sharing_intent = Some(intent),
            None => {
                let mut pii = PiiResult::absent();
                pii.sharing_intent = Some(intent);
                state.pii = Some(pii);
            }
        }

        if intent {
            state.action = Some(ModAction::new(ActionKind::DeleteMessage, PII_INTENT_REASON));

            tracing::info!(
                message_id = %state.message.message_id,
                "PII sharing intent detected, message blocked"
            );
            return Ok(Transition::Done);
        }

        Ok(Transition::Next(ModerationStage::ModerateContent))
    }

    async fn moderate_content(&self, state: &mut ModerationState) -> Result<Transition> {
        let mut scores = self.classifier.harm_scores(&state.message.content).await;
        if scores.is_empty() {
            scores = default_harm_scores();
        }

        // Highest confidence wins; ties keep the first-seen label.
        let mut dominant_item = &scores[0];
        for item in &scores[1..] {
            if item.score > dominant_item.score {
                dominant_item = item;
            }
        }

        let dominant = match HarmCategory::parse_label(&dominant_item.label) {
            Some(category) => category,
            None => {
                tracing::warn!(
                    label = %dominant_item.label,
                    "unknown harm category, defaulting to OK"
                );
                HarmCategory::Ok
            }
        };

        let mut categories: Vec<(String, f64)> = Vec::new();
        for item in &scores {
            if !categories.iter().any(|(label, _)| label == &item.label) {
                categories.push((item.label.clone(), item.score));
            }
        }

        state.content = Some(ContentResult {
            dominant,
            categories,
        });

        if dominant == HarmCategory::Ok {
            tracing::debug!(
                message_id = %state.message.message_id,
                "content approved"
            );
            return Ok(Transition::Done);
        }

        Ok(Transition::Next(ModerationStage::DetermineAction))
    }

    async fn determine_action(&self, state: &mut ModerationState) -> Result<Transition> {
        // Present iff ModerateContent routed here.
        let dominant = state
            .content
            .as_ref()
            .map(|content| content.dominant)
            .unwrap_or_default();

        let action = match self
            .judge
            .moderation_action(dominant, &state.message.content)
            .await
        {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(
                    message_id = %state.message.message_id,
                    error = %e,
                    "action judgment failed, applying warning fallback"
                );
                ModAction::new(ActionKind::Warning, MANUAL_REVIEW_REASON)
            }
        };

        tracing::info!(
            message_id = %state.message.message_id,
            action = ?action.action,
            "moderation action determined"
        );

        state.action = Some(action);
        Ok(Transition::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatwarden_core::{Error, LabelScore, SentimentScores};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Stub classifier returning fixed responses, counting calls per endpoint
    struct StubClassifier {
        entities: Vec<LabelScore>,
        harm: Vec<LabelScore>,
        entity_calls: AtomicU32,
        harm_calls: AtomicU32,
    }

    impl StubClassifier {
        fn new(entities: Vec<LabelScore>, harm: Vec<LabelScore>) -> Self {
            Self {
                entities,
                harm,
                entity_calls: AtomicU32::new(0),
                harm_calls: AtomicU32::new(0),
            }
        }

        fn clean(harm: Vec<LabelScore>) -> Self {
            Self::new(Vec::new(), harm)
        }

        fn harm_calls(&self) -> u32 {
            self.harm_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl TextClassifier for StubClassifier {
        async fn extract_entities(&self, _text: &str) -> Vec<LabelScore> {
            self.entity_calls.fetch_add(1, Ordering::Relaxed);
            self.entities.clone()
        }

        async fn harm_scores(&self, _text: &str) -> Vec<LabelScore> {
            self.harm_calls.fetch_add(1, Ordering::Relaxed);
            self.harm.clone()
        }

        async fn sentiment_scores(&self, _text: &str) -> SentimentScores {
            SentimentScores::all_neutral()
        }
    }

    /// Stub judge with configurable intent and action replies
    struct StubJudge {
        intent: Result<bool>,
        action: Result<ModAction>,
        intent_calls: AtomicU32,
        action_calls: AtomicU32,
    }

    impl StubJudge {
        fn new(intent: Result<bool>, action: Result<ModAction>) -> Self {
            Self {
                intent,
                action,
                intent_calls: AtomicU32::new(0),
                action_calls: AtomicU32::new(0),
            }
        }

        fn benign() -> Self {
            Self::new(Ok(false), Err(Error::oracle("unused")))
        }

        fn failing() -> Self {
            Self::new(Err(Error::oracle("down")), Err(Error::oracle("down")))
        }

        fn intent_calls(&self) -> u32 {
            self.intent_calls.load(Ordering::Relaxed)
        }

        fn action_calls(&self) -> u32 {
            self.action_calls.load(Ordering::Relaxed)
        }
    }

    fn clone_result<T: Clone>(result: &Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(Error::oracle(e.to_string())),
        }
    }

    #[async_trait]
    impl PolicyJudge for StubJudge {
        async fn pii_sharing_intent(&self, _text: &str) -> Result<bool> {
            self.intent_calls.fetch_add(1, Ordering::Relaxed);
            clone_result(&self.intent)
        }

        async fn community_intent(&self, _text: &str) -> Result<chatwarden_core::CommunityIntent> {
            Ok(chatwarden_core::CommunityIntent::default())
        }

        async fn moderation_action(
            &self,
            _category: HarmCategory,
            _text: &str,
        ) -> Result<ModAction> {
            self.action_calls.fetch_add(1, Ordering::Relaxed);
            clone_result(&self.action)
        }
    }

    fn message(content: &str) -> ChatMessage {
        ChatMessage::new("msg-1", content, 42)
    }

    fn ok_scores() -> Vec<LabelScore> {
        vec![LabelScore::new("OK", 0.98), LabelScore::new("H", 0.02)]
    }

    #[tokio::test]
    async fn test_pii_detection_short_circuits() {
        let classifier = Arc::new(StubClassifier::new(
            vec![LabelScore::new("EMAIL", 0.99)],
            ok_scores(),
        ));
        let judge = Arc::new(StubJudge::benign());
        let pipeline = ModerationPipeline::new(classifier.clone(), judge.clone());

        let state = pipeline.run(message("reach me at a@b.com")).await;

        let action = state.action.unwrap();
        assert_eq!(action.action, ActionKind::DeleteMessage);
        assert_eq!(action.reason, "Detected EMAIL in message");

        let pii = state.pii.unwrap();
        assert!(pii.presence);
        assert_eq!(pii.category, Some(PiiCategory::Email));

        // No later stage may run after the short circuit.
        assert_eq!(judge.intent_calls(), 0);
        assert_eq!(classifier.harm_calls(), 0);
        assert!(state.content.is_none());
    }

    #[tokio::test]
    async fn test_non_pii_entities_pass_through() {
        let classifier = Arc::new(StubClassifier::new(
            vec![LabelScore::new("I-MISC", 0.8)],
            ok_scores(),
        ));
        let judge = Arc::new(StubJudge::benign());
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("just chatting")).await;

        assert!(state.is_benign());
        assert!(!state.pii.unwrap().presence);
    }

    #[tokio::test]
    async fn test_sharing_intent_blocks_message() {
        let classifier = Arc::new(StubClassifier::clean(ok_scores()));
        let judge = Arc::new(StubJudge::new(Ok(true), Err(Error::oracle("unused"))));
        let pipeline = ModerationPipeline::new(classifier.clone(), judge);

        let state = pipeline.run(message("dm me your password later")).await;

        let action = state.action.unwrap();
        assert_eq!(action.action, ActionKind::DeleteMessage);
        assert_eq!(action.reason, "Potential PII sharing intent detected");
        assert_eq!(state.pii.unwrap().sharing_intent, Some(true));
        assert_eq!(classifier.harm_calls(), 0);
    }

    #[tokio::test]
    async fn test_intent_failure_fails_open() {
        let classifier = Arc::new(StubClassifier::clean(ok_scores()));
        let judge = Arc::new(StubJudge::new(
            Err(Error::oracle("down")),
            Err(Error::oracle("unused")),
        ));
        let pipeline = ModerationPipeline::new(classifier.clone(), judge);

        let state = pipeline.run(message("hello there")).await;

        assert!(state.is_benign());
        assert_eq!(state.pii.unwrap().sharing_intent, Some(false));
        assert_eq!(classifier.harm_calls(), 1);
    }

    #[tokio::test]
    async fn test_harmful_content_uses_judge_action() {
        let classifier = Arc::new(StubClassifier::clean(vec![
            LabelScore::new("OK", 0.2),
            LabelScore::new("HR", 0.7),
            LabelScore::new("V", 0.1),
        ]));
        let judge = Arc::new(StubJudge::new(
            Ok(false),
            Ok(ModAction::new(ActionKind::Mute, "repeated harassment")),
        ));
        let pipeline = ModerationPipeline::new(classifier, judge.clone());

        let state = pipeline.run(message("you are all useless")).await;

        let content = state.content.as_ref().unwrap();
        assert_eq!(content.dominant, HarmCategory::Harassment);
        assert_eq!(content.categories.len(), 3);
        assert_eq!(content.categories[0].0, "OK");

        let action = state.action.unwrap();
        assert_eq!(action.action, ActionKind::Mute);
        assert_eq!(judge.action_calls(), 1);
    }

    #[tokio::test]
    async fn test_action_judge_failure_falls_back_to_warning() {
        let classifier = Arc::new(StubClassifier::clean(vec![
            LabelScore::new("H", 0.9),
            LabelScore::new("OK", 0.1),
        ]));
        let judge = Arc::new(StubJudge::new(Ok(false), Err(Error::oracle("down"))));
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("hateful text")).await;

        let action = state.action.unwrap();
        assert_eq!(action.action, ActionKind::Warning);
        assert_eq!(action.reason, "Automated moderation - manual review required");
    }

    #[tokio::test]
    async fn test_unknown_harm_label_coerces_to_ok() {
        let classifier = Arc::new(StubClassifier::clean(vec![LabelScore::new(
            "NOT_A_CATEGORY",
            0.9,
        )]));
        let judge = Arc::new(StubJudge::benign());
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("odd classifier output")).await;

        assert!(state.is_benign());
        assert_eq!(state.content.unwrap().dominant, HarmCategory::Ok);
    }

    #[tokio::test]
    async fn test_dominant_tie_keeps_first_seen() {
        let classifier = Arc::new(StubClassifier::clean(vec![
            LabelScore::new("V", 0.5),
            LabelScore::new("H", 0.5),
        ]));
        let judge = Arc::new(StubJudge::new(
            Ok(false),
            Ok(ModAction::new(ActionKind::Kick, "violent threats")),
        ));
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("tied scores")).await;

        assert_eq!(state.content.unwrap().dominant, HarmCategory::Violence);
    }

    #[tokio::test]
    async fn test_empty_harm_response_is_benign() {
        let classifier = Arc::new(StubClassifier::clean(Vec::new()));
        let judge = Arc::new(StubJudge::benign());
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("empty response")).await;

        assert!(state.is_benign());
        assert_eq!(state.content.unwrap().dominant, HarmCategory::Ok);
    }

    #[tokio::test]
    async fn test_all_oracles_failing_still_completes() {
        // A failing classifier client substitutes its documented defaults,
        // so the run degrades to a benign disposition instead of erroring.
        let classifier = Arc::new(StubClassifier::clean(default_harm_scores()));
        let judge = Arc::new(StubJudge::failing());
        let pipeline = ModerationPipeline::new(classifier, judge);

        let state = pipeline.run(message("everything is down")).await;

        assert!(state.pii.is_some());
        assert!(state.content.is_some());
        assert_eq!(state.pii.unwrap().sharing_intent, Some(false));
    }
}
