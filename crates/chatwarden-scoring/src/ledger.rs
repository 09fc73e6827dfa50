//! Process-lifetime per-user score ledger
//!
//! A single shared structure mutated only by additive updates keyed by
//! user id. Updates are read-modify-write on an integer counter, so all
//! mutation goes through one lock; entries are created lazily on first
//! sight of a user and never reset while the process is alive.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

/// A user's current standing in the ledger
#[derive(Debug, Clone, Serialize)]
pub struct UserScore {
    /// User identifier
    pub user_id: u64,

    /// Last-known display name, or a synthesized placeholder
    pub user_name: String,

    /// Cumulative points
    pub score: i64,
}

/// Summary statistics over the whole ledger
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStats {
    /// Number of known users
    pub total_users: usize,

    /// Sum of all scores
    pub total_points: i64,

    /// Mean score, 0 when the ledger is empty
    pub average_score: f64,

    /// Maximum score, 0 when the ledger is empty
    pub highest_score: i64,
}

#[derive(Debug, Default)]
struct LedgerEntry {
    score: i64,
    user_name: Option<String>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    /// User ids in first-seen order; leaderboard ties break on this
    order: Vec<u64>,
    entries: HashMap<u64, LedgerEntry>,
}

/// In-memory score ledger shared across pipeline runs
#[derive(Debug, Default)]
pub struct ScoreLedger {
    inner: RwLock<LedgerInner>,
}

impl ScoreLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to a user's score, creating the entry at zero if the
    /// user is new; a provided display name replaces the stored one
    pub fn record_reward(&self, user_id: u64, user_name: Option<&str>, points: i64) {
        let mut inner = self.inner.write();

        let entry = inner.entries.entry(user_id).or_default();
        entry.score += points;
        if let Some(name) = user_name {
            entry.user_name = Some(name.to_string());
        }
        let score = entry.score;

        if !inner.order.contains(&user_id) {
            inner.order.push(user_id);
        }

        tracing::info!(user_id, points, score, "recorded reward");
    }

    /// Current cumulative score for a user; unknown users report zero
    /// with a placeholder name
    pub fn get_user_score(&self, user_id: u64) -> UserScore {
        let inner = self.inner.read();

        match inner.entries.get(&user_id) {
            Some(entry) => UserScore {
                user_id,
                user_name: display_name(user_id, entry),
                score: entry.score,
            },
            None => UserScore {
                user_id,
                user_name: placeholder_name(user_id),
                score: 0,
            },
        }
    }

    /// Top users by score descending; equal scores keep first-seen order
    pub fn get_leaderboard(&self, limit: usize) -> Vec<UserScore> {
        let inner = self.inner.read();

        let mut board: Vec<UserScore> = inner
            .order
            .iter()
            .filter_map(|user_id| {
                inner.entries.get(user_id).map(|entry| UserScore {
                    user_id: *user_id,
                    user_name: display_name(*user_id, entry),
                    score: entry.score,
                })
            })
            .collect();

        // Stable sort keeps insertion order within equal scores.
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board.truncate(limit);
        board
    }

    /// Summary statistics over all known users
    pub fn get_stats(&self) -> LedgerStats {
        let inner = self.inner.read();

        let total_users = inner.entries.len();
        let total_points: i64 = inner.entries.values().map(|entry| entry.score).sum();
        let average_score = if total_users == 0 {
            0.0
        } else {
            total_points as f64 / total_users as f64
        };
        let highest_score = inner
            .entries
            .values()
            .map(|entry| entry.score)
            .max()
            .unwrap_or(0);

        LedgerStats {
            total_users,
            total_points,
            average_score,
            highest_score,
        }
    }
}

fn display_name(user_id: u64, entry: &LedgerEntry) -> String {
    entry
        .user_name
        .clone()
        .unwrap_or_else(|| placeholder_name(user_id))
}

fn placeholder_name(user_id: u64) -> String {
    format!("user_{user_id}")
}
