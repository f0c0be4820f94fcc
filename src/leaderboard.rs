use chrono::{DateTime, Local};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::session::RunResult;

/// Entries retained per duration bucket.
pub const MAX_ENTRIES: usize = 3;

/// Longest accepted player name; longer input is truncated, not rejected.
pub const MAX_NAME_LEN: usize = 10;

const DEFAULT_NAME: &str = "Player";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: usize,
    pub accuracy: f64,
    pub words: usize,
    pub timestamp: DateTime<Local>,
}

/// Minimal key-value persistence surface so the ranking logic has no
/// compiled-in storage backend.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    map: HashMap<String, String>,
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one JSON object mapping keys to raw values.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    path: PathBuf,
}

impl FileKvStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "kanatap") {
            pd.data_dir().join("scores.json")
        } else {
            PathBuf::from("kanatap_scores.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> HashMap<String, String> {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&map).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

fn leaderboard_key(duration_secs: u64) -> String {
    format!("leaderboard_{duration_secs}")
}

fn high_score_key(duration_secs: u64) -> String {
    format!("highscore_{duration_secs}")
}

/// Higher score first, then higher accuracy, then earlier run.
fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.accuracy.partial_cmp(&a.accuracy).unwrap_or(Ordering::Equal))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Per-duration top-3 retention plus a per-duration best score.
#[derive(Debug)]
pub struct LeaderboardStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> LeaderboardStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current entries for a duration; malformed or missing data reads as
    /// empty rather than failing.
    pub fn top(&self, duration_secs: u64) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .store
            .get(&leaderboard_key(duration_secs))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        entries.sort_by(compare_entries);
        entries.truncate(MAX_ENTRIES);
        entries
    }

    /// Insert a finished run provisionally (empty name), persist the new
    /// top 3, and report the run's rank when it placed. The caller prompts
    /// for a name and attaches it with `set_name`.
    pub fn record(
        &mut self,
        duration_secs: u64,
        run: &RunResult,
        now: DateTime<Local>,
    ) -> (Vec<LeaderboardEntry>, Option<usize>) {
        let mut entries = self.top(duration_secs);
        let entry = LeaderboardEntry {
            name: String::new(),
            score: run.correct_keystrokes,
            accuracy: run.accuracy,
            words: run.successful_words,
            timestamp: now,
        };
        entries.push(entry.clone());
        entries.sort_by(compare_entries);
        let rank = entries
            .iter()
            .position(|e| e == &entry)
            .filter(|&r| r < MAX_ENTRIES);
        entries.truncate(MAX_ENTRIES);
        self.save(duration_secs, &entries);
        (entries, rank)
    }

    /// Attach a player name to a just-recorded entry. Over-long names are
    /// truncated; a blank prompt becomes the default name.
    pub fn set_name(&mut self, duration_secs: u64, rank: usize, name: &str) {
        let mut entries = self.top(duration_secs);
        if rank >= entries.len() {
            return;
        }
        let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        entries[rank].name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed
        };
        self.save(duration_secs, &entries);
    }

    pub fn high_score(&self, duration_secs: u64) -> usize {
        self.store
            .get(&high_score_key(duration_secs))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }

    /// Keep the best correct-keystroke count for the duration; returns the
    /// new best.
    pub fn record_high_score(&mut self, duration_secs: u64, score: usize) -> usize {
        let best = self.high_score(duration_secs).max(score);
        let _ = self
            .store
            .set(&high_score_key(duration_secs), &best.to_string());
        best
    }

    fn save(&mut self, duration_secs: u64, entries: &[LeaderboardEntry]) {
        if let Ok(raw) = serde_json::to_string(entries) {
            let _ = self.store.set(&leaderboard_key(duration_secs), &raw);
        }
    }
}
