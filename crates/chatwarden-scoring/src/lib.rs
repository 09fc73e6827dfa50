//! ChatWarden Scoring
//!
//! In-memory aggregation of per-user reputation points fed by sentiment
//! pipeline outputs: additive reward recording, leaderboard ranking, and
//! summary statistics. Best-effort and process-local; nothing here is a
//! transactional ledger.

pub mod ledger;

pub use ledger::{LedgerStats, ScoreLedger, UserScore};
