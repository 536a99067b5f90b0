//! Top-10 leaderboard
//!
//! Entries stay sorted by score, highest first; an equal score ranks below
//! the entries already holding it.

use serde::{Deserialize, Serialize};

use crate::storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

const STORAGE_KEY: &str = "snake_rush_highscores";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Primary food eaten that game
    pub food_eaten: u32,
    /// Snake length at the end
    pub length: usize,
    /// Unix time in ms
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the score would take (0-indexed), if it makes the board
    fn slot_for(&self, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let slot = self.entries.partition_point(|e| e.score >= score);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    pub fn qualifies(&self, score: u32) -> bool {
        self.slot_for(score).is_some()
    }

    /// Insert if it makes the board; returns the 1-based rank
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let slot = self.slot_for(entry.score)?;
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load() -> Self {
        match storage::load::<HighScores>(STORAGE_KEY) {
            Some(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => Self::new(),
        }
    }

    pub fn save(&self) {
        if storage::save(STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> HighScoreEntry {
        HighScoreEntry {
            score,
            food_eaten: score / 10,
            length: 3,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(50)), Some(1));
        assert_eq!(scores.add(entry(90)), Some(1));
        assert_eq!(scores.add(entry(70)), Some(2));
        assert_eq!(scores.add(entry(70)), Some(3));
        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![90, 70, 70, 50]);
    }

    #[test]
    fn test_full_board() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u32 {
            scores.add(entry(s * 10));
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.add(entry(5)), None);
        assert_eq!(scores.add(entry(15)), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
        assert_eq!(scores.top_score(), Some(100));
    }
}
