//! Collaborators outside the puzzle: play credits and score submission
//!
//! The engine only sees the two traits. The binary backs them with a daily
//! allowance kept in the settings file and a leaderboard file on disk.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Entries kept on the local leaderboard
const LEADERBOARD_LEN: usize = 10;

/// Why a score could not be recorded
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("leaderboard file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    /// The sink could not be reached at all
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
}

/// Receives the final score of a finished session
pub trait ScoreSink {
    fn submit_score(&mut self, player_id: &str, score: u64) -> Result<(), SubmitError>;
}

/// Gates session starts
pub trait PlayCredits {
    fn remaining_credits(&self) -> u32;
    fn spend_credit(&mut self);
}

/// Days since the Unix epoch
pub fn today() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or_default()
}

/// Format a day number as YYYY-MM-DD
pub fn format_day(days: u64) -> String {
    // Civil-from-days over 400-year eras
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Per-day allowance of sessions, persisted with the settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DailyCredits {
    /// Sessions granted each day
    pub daily_allowance: u32,
    /// Sessions left today
    pub remaining: u32,
    /// Day the allowance was last refilled
    pub day: u64,
}

impl Default for DailyCredits {
    fn default() -> Self {
        Self {
            daily_allowance: 5,
            remaining: 5,
            day: 0,
        }
    }
}

impl DailyCredits {
    /// Refill the allowance when a new day has started
    pub fn refresh(&mut self, today: u64) {
        if self.day != today {
            tracing::info!(today, allowance = self.daily_allowance, "Refilling daily play credits");
            self.day = today;
            self.remaining = self.daily_allowance;
        }
    }
}

impl PlayCredits for DailyCredits {
    fn remaining_credits(&self) -> u32 {
        self.remaining
    }

    fn spend_credit(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: u64,
    /// Date as ISO string
    pub date: String,
}

/// Top scores stored as JSON on disk
#[derive(Debug, Clone)]
pub struct LocalLeaderboard {
    path: PathBuf,
}

impl LocalLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Leaderboard in the platform data directory
    pub fn open_default() -> Option<Self> {
        ProjectDirs::from("com", "blockdrop", "blockdrop")
            .map(|dirs| Self::new(dirs.data_dir().join("leaderboard.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read entries, best first. A missing file is an empty board.
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>, SubmitError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries for display; read errors show as an empty board
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("Could not read leaderboard {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), SubmitError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ScoreSink for LocalLeaderboard {
    fn submit_score(&mut self, player_id: &str, score: u64) -> Result<(), SubmitError> {
        let mut entries = self.load()?;
        entries.push(LeaderboardEntry {
            player: player_id.to_string(),
            score,
            date: format_day(today()),
        });
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_LEN);
        self.save(&entries)
    }
}

/// A missing leaderboard refuses every score
impl<S: ScoreSink> ScoreSink for Option<S> {
    fn submit_score(&mut self, player_id: &str, score: u64) -> Result<(), SubmitError> {
        match self {
            Some(sink) => sink.submit_score(player_id, score),
            None => Err(SubmitError::Unavailable("no data directory".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blockdrop-test-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        dir.join("leaderboard.json")
    }

    #[test]
    fn test_credits_refresh_on_new_day() {
        let mut credits = DailyCredits {
            daily_allowance: 3,
            remaining: 0,
            day: 100,
        };
        credits.refresh(100);
        assert_eq!(credits.remaining_credits(), 0);
        credits.refresh(101);
        assert_eq!(credits.remaining_credits(), 3);
        assert_eq!(credits.day, 101);
    }

    #[test]
    fn test_spend_never_underflows() {
        let mut credits = DailyCredits {
            daily_allowance: 1,
            remaining: 1,
            day: 0,
        };
        credits.spend_credit();
        credits.spend_credit();
        assert_eq!(credits.remaining_credits(), 0);
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day(0), "1970-01-01");
        assert_eq!(format_day(59), "1970-03-01");
        assert_eq!(format_day(19_723), "2024-01-01");
        assert_eq!(format_day(19_782), "2024-02-29");
    }

    #[test]
    fn test_leaderboard_keeps_best_scores() {
        let path = scratch_file("best");
        let mut board = LocalLeaderboard::new(&path);
        assert!(board.load().unwrap().is_empty());

        for score in 0..15u64 {
            board.submit_score("ada", score * 10).unwrap();
        }
        let entries = board.load().unwrap();
        assert_eq!(entries.len(), LEADERBOARD_LEN);
        assert_eq!(entries[0].score, 140);
        assert_eq!(entries.last().unwrap().score, 50);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_leaderboard_is_unavailable() {
        let mut none: Option<LocalLeaderboard> = None;
        assert!(matches!(none.submit_score("ada", 5), Err(SubmitError::Unavailable(_))));

        let path = scratch_file("some");
        let mut some = Some(LocalLeaderboard::new(&path));
        some.submit_score("ada", 5).unwrap();
        assert_eq!(LocalLeaderboard::new(&path).load().unwrap()[0].score, 5);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_leaderboard_is_reported() {
        let path = scratch_file("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let mut board = LocalLeaderboard::new(&path);
        assert!(matches!(board.submit_score("ada", 1), Err(SubmitError::Json(_))));
        assert!(board.entries().is_empty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
