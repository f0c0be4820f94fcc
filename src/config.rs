use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Duration clamp applied to any externally supplied value.
pub const MIN_DURATION_SECS: u64 = 1;
pub const MAX_DURATION_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_secs: u64,
    pub case_sensitive: bool,
    pub romaji_input: bool,
    pub randomize: bool,
    pub no_repeat_in_session: bool,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub word_list: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 15,
            case_sensitive: false,
            romaji_input: true,
            randomize: true,
            no_repeat_in_session: false,
            min_word_length: 1,
            max_word_length: 32,
            word_list: "japanese".to_string(),
        }
    }
}

impl Config {
    /// Clamp externally supplied values into usable ranges.
    pub fn normalized(mut self) -> Self {
        self.duration_secs = self
            .duration_secs
            .clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        if self.min_word_length == 0 {
            self.min_word_length = 1;
        }
        if self.max_word_length < self.min_word_length {
            self.max_word_length = self.min_word_length;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "kanatap") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("kanatap_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.normalized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
