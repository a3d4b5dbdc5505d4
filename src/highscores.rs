//! Score hand-off and local leaderboard
//!
//! A finished run produces one [`ScoreRecord`]. The loop passes it to a
//! [`ScoreSubmitter`] exactly once; retrying is the submitter's business.

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::settings::MAX_NICKNAME_LEN;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Payload handed to the ranking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub nickname: String,
    /// Seconds survived, two-decimal precision
    pub score: f64,
}

impl ScoreRecord {
    pub fn new(nickname: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            nickname: nickname.into(),
            score: crate::survival_seconds(elapsed_ms),
        }
    }

    /// Check the record is acceptable for submission
    pub fn validate(&self) -> Result<(), SubmitError> {
        let nickname = self.nickname.trim();
        if nickname.is_empty() {
            return Err(SubmitError::EmptyNickname);
        }
        let len = nickname.chars().count();
        if len > MAX_NICKNAME_LEN {
            return Err(SubmitError::NicknameTooLong {
                len,
                max: MAX_NICKNAME_LEN,
            });
        }
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(SubmitError::InvalidScore { score: self.score });
        }
        Ok(())
    }

    /// JSON body for the ranking service
    pub fn to_json(&self) -> Result<String, SubmitError> {
        serde_json::to_string(self).map_err(|err| SubmitError::Unavailable {
            reason: err.to_string(),
        })
    }
}

/// Receives the final score of each run
pub trait ScoreSubmitter {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub nickname: String,
    /// Seconds survived
    pub score: f64,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "survival_dodge_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: f64) -> bool {
        if score <= 0.0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a record to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, record: &ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        let entry = HighScoreEntry {
            nickname: record.nickname.trim().to_string(),
            score: record.score,
        };

        let rank = match self.entries.iter().position(|e| record.score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<f64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SubmitError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| SubmitError::Unavailable {
                reason: "no LocalStorage".to_string(),
            })?;

        let json = serde_json::to_string(self).map_err(|err| SubmitError::Unavailable {
            reason: err.to_string(),
        })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| SubmitError::Unavailable {
                reason: "LocalStorage write rejected".to_string(),
            })?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), SubmitError> {
        // No-op for native
        Ok(())
    }
}

impl ScoreSubmitter for HighScores {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError> {
        record.validate()?;
        match self.add(record) {
            Some(rank) => {
                log::info!("{} ranked #{} with {:.2}s", record.nickname, rank, record.score);
                self.save()
            }
            None => {
                log::info!("{:.2}s did not make the leaderboard", record.score);
                Ok(())
            }
        }
    }
}
