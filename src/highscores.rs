//! High score leaderboard system
//!
//! One table per game mode, persisted to `highscores.json` as a JSON object
//! mapping mode name to `[{name, score}]`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};

/// Mode keys every table file carries
pub const STANDARD_MODES: [&str; 2] = ["classic", "obstacles"];

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// On-disk layout
type ScoreFile = BTreeMap<String, Vec<HighScoreEntry>>;

/// Per-mode leaderboards
#[derive(Debug, Clone, PartialEq)]
pub struct HighScores {
    tables: ScoreFile,
    max_scores: usize,
}

impl HighScores {
    /// Create empty leaderboards holding `max_scores` entries per mode
    pub fn new(max_scores: usize) -> Self {
        let tables = STANDARD_MODES
            .iter()
            .map(|mode| (mode.to_string(), Vec::new()))
            .collect();
        Self {
            tables,
            max_scores: max_scores.max(1),
        }
    }

    /// Build from parsed file contents.
    ///
    /// Tables are re-sorted and trimmed so a hand-edited file cannot break
    /// the ordering invariant. Unknown modes are kept as they are.
    fn from_file(file: ScoreFile, max_scores: usize) -> Self {
        let mut scores = Self::new(max_scores);
        for (mode, mut entries) in file {
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(scores.max_scores);
            scores.tables.insert(mode, entries);
        }
        scores
    }

    /// Entries for a mode, best first
    pub fn entries(&self, mode: &str) -> &[HighScoreEntry] {
        self.tables.get(mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All modes present, including unknown ones from the file
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn max_scores(&self) -> usize {
        self.max_scores
    }

    /// Get the top score for a mode (if any)
    pub fn top_score(&self, mode: &str) -> Option<u64> {
        self.entries(mode).first().map(|e| e.score)
    }

    /// Insertion index for a score: after every entry with an equal or
    /// better score, so earlier submissions win ties
    fn insertion_index(&self, mode: &str, score: u64) -> usize {
        let entries = self.entries(mode);
        entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(entries.len())
    }

    /// Get the rank a score would achieve (1-indexed, None if it would be cut)
    pub fn potential_rank(&self, mode: &str, score: u64) -> Option<usize> {
        let index = self.insertion_index(mode, score);
        (index < self.max_scores).then_some(index + 1)
    }

    /// Add a score to a mode's table.
    ///
    /// Returns the rank achieved (1-indexed) or None if the entry fell off
    /// the end of a full table.
    pub fn add_score(&mut self, name: &str, score: u64, mode: &str) -> Option<usize> {
        let index = self.insertion_index(mode, score);
        let entries = self.tables.entry(mode.to_string()).or_default();
        entries.insert(
            index,
            HighScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        entries.truncate(self.max_scores);
        (index < self.max_scores).then_some(index + 1)
    }

    /// Load high scores from a file.
    ///
    /// A missing or unreadable file yields empty tables, which are written
    /// back immediately so the next run finds a valid file.
    pub fn load_from(path: &Path, max_scores: usize) -> Self {
        match persistence::load_json::<ScoreFile>(path) {
            Ok(file) => {
                let scores = Self::from_file(file, max_scores);
                log::info!(
                    "Loaded high scores for {} modes from {}",
                    scores.tables.len(),
                    path.display()
                );
                return scores;
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high scores found, starting fresh");
            }
            Err(e) => {
                log::error!("Error loading high scores: {e}");
            }
        }

        let scores = Self::new(max_scores);
        if let Err(e) = scores.save_to(path) {
            log::error!("Could not initialise high score file: {e}");
        }
        scores
    }

    /// Save high scores to a file
    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, &self.tables)?;
        log::info!("High scores saved to {}", path.display());
        Ok(())
    }
}
