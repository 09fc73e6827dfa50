//! Text-classification oracle client
//!
//! Wraps the three hosted classification endpoints (PII entity extraction,
//! harm-category scoring, sentiment distribution) behind a single trait.
//! The client owns the timeout and fallback policy: a transport failure,
//! timeout, or malformed response degrades to the documented default for
//! that endpoint and is logged, never surfaced to the pipelines.

use async_trait::async_trait;
use chatwarden_core::{Error, LabelScore, Result, SentimentScores};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Wire labels of the 3-way sentiment model
const NEGATIVE_LABEL: &str = "LABEL_0";
const NEUTRAL_LABEL: &str = "LABEL_1";
const POSITIVE_LABEL: &str = "LABEL_2";

/// Trait for the external text-classification oracle.
///
/// All methods are total: implementations substitute the documented
/// fallback value on failure rather than returning an error, so pipeline
/// stages never block indefinitely nor abort the run.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Extract PII-candidate entities from the text.
    ///
    /// Returns the classifier's ordered entity sequence, or an empty
    /// sequence on failure.
    async fn extract_entities(&self, text: &str) -> Vec<LabelScore>;

    /// Score the text against the harm-category taxonomy.
    ///
    /// Returns the ordered label/confidence sequence, or `[{OK, 1.0}]` on
    /// failure.
    async fn harm_scores(&self, text: &str) -> Vec<LabelScore>;

    /// Fetch the 3-way sentiment distribution for the text.
    ///
    /// Returns an all-neutral distribution on failure.
    async fn sentiment_scores(&self, text: &str) -> SentimentScores;
}

/// The documented fallback for the harm-category endpoint
pub fn default_harm_scores() -> Vec<LabelScore> {
    vec![LabelScore::new("OK", 1.0)]
}

/// Endpoint configuration for the classification oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierEndpoints {
    /// PII entity-extraction endpoint
    pub entity_url: String,

    /// Harm-category scoring endpoint
    pub harm_url: String,

    /// Sentiment distribution endpoint
    pub sentiment_url: String,

    /// Bearer token for the inference API
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierEndpoints {
    fn default() -> Self {
        Self {
            entity_url:
                "https://router.huggingface.co/hf-inference/models/iiiorg/piiranha-v1-detect-personal-information"
                    .to_string(),
            harm_url: "https://router.huggingface.co/hf-inference/models/KoalaAI/Text-Moderation"
                .to_string(),
            sentiment_url:
                "https://router.huggingface.co/hf-inference/models/cardiffnlp/twitter-roberta-base-sentiment"
                    .to_string(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// HTTP implementation of [`TextClassifier`] over hosted inference endpoints
pub struct HttpTextClassifier {
    client: reqwest::Client,
    endpoints: ClassifierEndpoints,
}

impl HttpTextClassifier {
    /// Create a new classifier client with a bounded request timeout
    pub fn new(endpoints: ClassifierEndpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()
            .map_err(|e| Error::oracle(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoints })
    }

    /// POST the text to a classification endpoint and coerce the response
    /// into an ordered label/score sequence
    async fn query_labels(&self, url: &str, text: &str) -> Result<Vec<LabelScore>> {
        let mut request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "inputs": text }));

        if let Some(token) = &self.endpoints.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::oracle(format!("classifier request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::oracle(format!("classifier returned error status: {e}")))?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::oracle(format!("classifier response was not JSON: {e}")))?;

        Ok(flatten_label_response(value))
    }
}

#[async_trait]
impl TextClassifier for HttpTextClassifier {
    async fn extract_entities(&self, text: &str) -> Vec<LabelScore> {
        match self.query_labels(&self.endpoints.entity_url, text).await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!(error = %e, "entity extraction failed, assuming no entities");
                Vec::new()
            }
        }
    }

    async fn harm_scores(&self, text: &str) -> Vec<LabelScore> {
        match self.query_labels(&self.endpoints.harm_url, text).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(error = %e, "harm scoring failed, using benign default");
                default_harm_scores()
            }
        }
    }

    async fn sentiment_scores(&self, text: &str) -> SentimentScores {
        match self.query_labels(&self.endpoints.sentiment_url, text).await {
            Ok(scores) => sentiment_from_labels(&scores),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment scoring failed, using neutral default");
                SentimentScores::all_neutral()
            }
        }
    }
}

/// Coerce an inference response into an ordered label/score sequence.
///
/// Hosted endpoints return either a flat list of objects, a nested list
/// (batch of one input), or a single object; entity responses label the
/// category `entity_group` instead of `label`. Anything unrecognized
/// contributes nothing, so a malformed response coerces to empty.
pub(crate) fn flatten_label_response(value: Value) -> Vec<LabelScore> {
    let items = match value {
        Value::Array(items) => match items.first() {
            Some(Value::Array(_)) => match items.into_iter().next() {
                Some(Value::Array(inner)) => inner,
                _ => Vec::new(),
            },
            _ => items,
        },
        value @ Value::Object(_) => vec![value],
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let label = object
                .get("label")
                .or_else(|| object.get("entity_group"))?
                .as_str()?
                .to_string();
            let score = object.get("score").and_then(Value::as_f64).unwrap_or(0.0);
            Some(LabelScore::new(label, score))
        })
        .collect()
}

/// Map raw sentiment labels onto the 3-way distribution, defaulting
/// missing labels to zero probability
pub(crate) fn sentiment_from_labels(items: &[LabelScore]) -> SentimentScores {
    let mut scores = SentimentScores::default();

    for item in items {
        match item.label.as_str() {
            NEGATIVE_LABEL => scores.negative = item.score,
            NEUTRAL_LABEL => scores.neutral = item.score,
            POSITIVE_LABEL => scores.positive = item.score,
            other => {
                tracing::debug!(label = other, "ignoring unknown sentiment label");
            }
        }
    }

    scores
}
