use chrono::{DateTime, Local};
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use crate::session::RunResult;

/// Append-only CSV log of finished runs.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "kanatap") {
            pd.config_dir().join("history.csv")
        } else {
            PathBuf::from("kanatap_history.csv")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, run: &RunResult, finished_at: DateTime<Local>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record([
                "date",
                "duration_secs",
                "score",
                "total_keystrokes",
                "words",
                "accuracy",
                "cpm",
                "wpm",
            ])?;
        }
        writer.write_record([
            finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            run.duration_secs.to_string(),
            run.correct_keystrokes.to_string(),
            run.total_keystrokes.to_string(),
            run.successful_words.to_string(),
            format!("{:.3}", run.accuracy),
            run.cpm.to_string(),
            run.wpm.to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}
