//! High score leaderboard
//!
//! Keeps the top 10 scores per level. [`LocalScoreBoard`] holds one
//! leaderboard per level and doubles as an in-process score submitter.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::session::{ScoreSubmission, ScoreSubmitter, SubmissionOutcome, SubmissionReply};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_id: String,
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if didn't qualify.
    /// Ties keep the earlier entry ahead.
    pub fn add_score(&mut self, player_id: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                player_id: player_id.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best listed score for a player
    pub fn personal_best(&self, player_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.player_id == player_id)
            .map(|e| e.score)
    }
}

/// In-process score store, one leaderboard per level id
#[derive(Debug, Default)]
pub struct LocalScoreBoard {
    levels: Mutex<HashMap<String, HighScores>>,
}

impl LocalScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission, returning its rank if it made the board
    pub fn record(&self, submission: &ScoreSubmission) -> Result<Option<usize>, String> {
        if submission.player_id.trim().is_empty() || submission.level_id.trim().is_empty() {
            return Err("player or level not found".to_string());
        }
        let mut levels = self
            .levels
            .lock()
            .map_err(|_| "score board unavailable".to_string())?;
        let board = levels.entry(submission.level_id.clone()).or_default();
        Ok(board.add_score(&submission.player_id, submission.score))
    }

    /// Copy of a level's leaderboard
    pub fn leaderboard(&self, level_id: &str) -> HighScores {
        match self.levels.lock() {
            Ok(levels) => levels.get(level_id).cloned().unwrap_or_default(),
            Err(_) => HighScores::new(),
        }
    }

    /// Serialize every leaderboard as JSON
    pub fn to_json(&self) -> String {
        let Ok(levels) = self.levels.lock() else {
            return "{}".to_string();
        };
        serde_json::to_string_pretty(&*levels).unwrap_or_else(|e| {
            log::error!("Failed to serialize score board: {e}");
            "{}".to_string()
        })
    }

    /// Restore leaderboards from JSON, starting empty if it cannot be parsed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HashMap<String, HighScores>>(json) {
            Ok(levels) => {
                log::info!("Loaded high scores for {} levels", levels.len());
                Self {
                    levels: Mutex::new(levels),
                }
            }
            Err(e) => {
                log::warn!("Failed to parse high scores: {e}, starting fresh");
                Self::new()
            }
        }
    }
}

impl ScoreSubmitter for LocalScoreBoard {
    fn submit(&self, submission: ScoreSubmission, reply: SubmissionReply) {
        let outcome = match self.record(&submission) {
            Ok(Some(rank)) => {
                log::info!(
                    "{} placed #{rank} on '{}' with {}",
                    submission.player_id,
                    submission.level_id,
                    submission.score
                );
                SubmissionOutcome::Accepted
            }
            Ok(None) => SubmissionOutcome::Accepted,
            Err(reason) => SubmissionOutcome::Failed(reason),
        };
        reply.settle(outcome);
    }
}
