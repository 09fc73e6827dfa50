//! ChatWarden Moderation
//!
//! The moderation half of the two-stage screening system: an explicit
//! finite-state pipeline that takes one chat message through PII
//! detection, PII-sharing-intent judgment, harm classification, and
//! remedial-action selection, producing one complete [`ModerationState`].
//!
//! The entry point never fails: oracle errors degrade to documented
//! fallbacks, and the worst case yields a conservative WARNING action.

pub mod pipeline;
pub mod state;

pub use pipeline::{ModerationPipeline, ModerationStage};
pub use state::{ContentResult, ModerationState, PiiResult};
