//! Moderation pipeline state record

use chatwarden_core::{ChatMessage, HarmCategory, ModAction, PiiCategory};
use serde::{Deserialize, Serialize};

/// Outcome of the PII stages.
///
/// Written at most twice per run: presence and category by the detection
/// stage, sharing intent by the intent stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiResult {
    /// Whether a PII entity was detected in the text
    pub presence: bool,

    /// Category of the first detected PII entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PiiCategory>,

    /// Whether the judge found intent to share personal information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing_intent: Option<bool>,
}

impl PiiResult {
    /// Result for a message with no detected PII
    pub fn absent() -> Self {
        Self {
            presence: false,
            category: None,
            sharing_intent: None,
        }
    }

    /// Result for a message containing the given PII category
    pub fn detected(category: Option<PiiCategory>) -> Self {
        Self {
            presence: true,
            category,
            sharing_intent: None,
        }
    }
}

/// Outcome of the harm-classification stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResult {
    /// The harm category with the highest confidence
    pub dominant: HarmCategory,

    /// Every returned label mapped to its confidence, in classifier
    /// response order; duplicate labels keep their first occurrence
    pub categories: Vec<(String, f64)>,
}

/// Aggregate state for one moderation run.
///
/// A recommended action is present exactly when the run reached a
/// terminal decision; a benign disposition leaves it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationState {
    /// The message under moderation
    pub message: ChatMessage,

    /// PII detection outcome, once the PII stages have run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii: Option<PiiResult>,

    /// Harm classification outcome, once the content stage has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentResult>,

    /// The recommended remedial action, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ModAction>,
}

impl ModerationState {
    /// Create a fresh state for one pipeline run
    pub fn new(message: ChatMessage) -> Self {
        Self {
            message,
            pii: None,
            content: None,
            action: None,
        }
    }

    /// Whether the run ended with a benign disposition (no action)
    pub fn is_benign(&self) -> bool {
        self.action.is_none()
    }
}
