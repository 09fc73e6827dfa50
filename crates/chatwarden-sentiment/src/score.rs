//! Sentiment score computation

use chatwarden_core::SentimentScores;

/// Compute the sentiment score from a 3-way label distribution.
///
/// `round((positive - negative) * (1 - neutral) * 100)`
///
/// The `(1 - neutral)` factor dampens the score when the classifier is
/// unconfident: high neutral mass pulls ambiguous text toward zero
/// instead of overreacting to a weak positive or negative lean. The
/// formula keeps the result in [-100, 100].
pub fn calculate_sentiment_score(scores: &SentimentScores) -> i32 {
    let difference = scores.positive - scores.negative;
    let confidence = 1.0 - scores.neutral;

    (difference * confidence * 100.0).round() as i32
}
