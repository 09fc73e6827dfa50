//! ChatWarden Oracles
//!
//! Clients for the two external oracles the decision pipelines depend on:
//!
//! - The **classification oracle** (entity extraction, harm scoring,
//!   sentiment distribution) - total methods with documented fallback
//!   values, so classifier failures fail open instead of aborting a run.
//! - The **policy judge** (generative judgments: PII-sharing intent,
//!   community intent, moderation action) - fallible methods; each
//!   pipeline stage applies its own fallback on error.
//!
//! Both are narrow traits so tests can swap in deterministic stubs.

pub mod classifier;
pub mod judge;
pub mod prompts;

pub use classifier::{
    default_harm_scores, ClassifierEndpoints, HttpTextClassifier, TextClassifier,
};
pub use judge::{HttpPolicyJudge, JudgeSettings, PolicyJudge};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassifierEndpoints, HttpTextClassifier, TextClassifier};
    pub use crate::judge::{HttpPolicyJudge, JudgeSettings, PolicyJudge};
}
