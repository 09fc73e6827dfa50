//! Policy judge oracle client
//!
//! Invokes a generative language model for the three judgment tasks the
//! pipelines need: boolean PII-sharing intent, community-intent
//! classification, and moderation-action selection. Unlike the
//! classification client, judge calls return `Result` - each pipeline
//! stage owns its own documented fallback and applies it on error.

use async_trait::async_trait;
use chatwarden_core::{CommunityIntent, Error, HarmCategory, ModAction, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prompts::{COMMUNITY_INTENT_PROMPT, MODERATION_ACTION_PROMPT, PII_INTENT_PROMPT};

/// Trait for the generative policy judge.
///
/// Abstracted so deterministic stubs can stand in during tests; no
/// specific inference backend is assumed.
#[async_trait]
pub trait PolicyJudge: Send + Sync {
    /// Judge whether the message shows intent to share personal information
    async fn pii_sharing_intent(&self, text: &str) -> Result<bool>;

    /// Classify the message's community intent, or null when none is clear
    async fn community_intent(&self, text: &str) -> Result<CommunityIntent>;

    /// Select a remedial action for content in the given harm category
    async fn moderation_action(&self, category: HarmCategory, text: &str) -> Result<ModAction>;
}

/// Settings for the chat-completions judge backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeSettings {
    /// Chat-completions endpoint URL
    pub api_url: String,

    /// Model identifier to request
    pub model: String,

    /// Bearer token for the API
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// HTTP implementation of [`PolicyJudge`] over an OpenAI-compatible
/// chat-completions API
pub struct HttpPolicyJudge {
    client: reqwest::Client,
    settings: JudgeSettings,
}

impl HttpPolicyJudge {
    /// Create a new judge client with a bounded request timeout
    pub fn new(settings: JudgeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::oracle(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// Run one completion and return the assistant's reply text
    async fn complete(&self, instruction: &str, user_text: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.settings.model,
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": user_text},
            ],
        });

        let mut request = self.client.post(&self.settings.api_url).json(&body);
        if let Some(token) = &self.settings.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::oracle(format!("judge request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::oracle(format!("judge returned error status: {e}")))?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::oracle(format!("judge response was not JSON: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::oracle("judge returned an empty completion"))
    }
}

#[async_trait]
impl PolicyJudge for HttpPolicyJudge {
    async fn pii_sharing_intent(&self, text: &str) -> Result<bool> {
        let reply = self.complete(PII_INTENT_PROMPT, text).await?;

        parse_bool_reply(&reply)
            .ok_or_else(|| Error::oracle(format!("expected true/false, got: {reply}")))
    }

    async fn community_intent(&self, text: &str) -> Result<CommunityIntent> {
        let reply = self.complete(COMMUNITY_INTENT_PROMPT, text).await?;
        parse_json_reply(&reply)
    }

    async fn moderation_action(&self, category: HarmCategory, text: &str) -> Result<ModAction> {
        let prompt = format!("Content type: {category}, Message: {text}");
        let reply = self.complete(MODERATION_ACTION_PROMPT, &prompt).await?;
        parse_json_reply(&reply)
    }
}

// =============================================================================
// Chat-completions response structures
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Parse a boolean judgment out of a free-text reply.
///
/// Accepts a bare `true`/`false` and tolerates surrounding prose by
/// taking whichever word appears first.
pub(crate) fn parse_bool_reply(reply: &str) -> Option<bool> {
    let lower = reply.trim().to_lowercase();

    match (lower.find("true"), lower.find("false")) {
        (Some(t), Some(f)) => Some(t < f),
        (Some(_), None) => Some(true),
        (None, Some(_)) => Some(false),
        (None, None) => None,
    }
}

/// Parse a structured judgment out of a reply that should be JSON.
///
/// Models occasionally wrap the object in prose or code fences, so fall
/// back to the outermost brace-delimited substring.
pub(crate) fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let trimmed = reply.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            return serde_json::from_str(&trimmed[start..=end])
                .map_err(|e| Error::oracle(format!("judge reply was not valid JSON: {e}")));
        }
    }

    Err(Error::oracle(format!(
        "judge reply contained no JSON object: {trimmed}"
    )))
}
