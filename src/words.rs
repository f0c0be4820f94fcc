use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::fs;
use std::path::Path;

static WORDS_DIR: Dir = include_dir!("src/words");

/// Served when no usable pool can be resolved, so a session never stalls.
pub const FALLBACK_WORDS: [&str; 3] = ["fallback", "typing", "game"];

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    /// Load one of the lists embedded in the binary.
    pub fn builtin(name: &str) -> Option<Self> {
        let file = WORDS_DIR.get_file(format!("{name}.json"))?;
        serde_json::from_str(file.contents_utf8()?).ok()
    }

    /// Load a plain-text list: one word per line, blank lines and lines
    /// starting with `#` skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let text = fs::read_to_string(path.as_ref()).ok()?;
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Some(Self {
            size: words.len() as u32,
            name,
            words,
        })
    }

    /// Resolve a list by embedded name first, then as a file path.
    pub fn load(source: &str) -> Option<Self> {
        Self::builtin(source).or_else(|| Self::from_file(source))
    }
}

pub fn fallback_pool() -> Vec<String> {
    FALLBACK_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Resolve the session word pool: load, filter by char length, and fall back
/// to the built-in words when loading fails or the filter empties the pool.
pub fn resolve_pool(source: &str, min_len: usize, max_len: usize) -> Vec<String> {
    let words = match WordList::load(source) {
        Some(list) => list.words,
        None => return fallback_pool(),
    };
    let filtered: Vec<String> = words
        .into_iter()
        .filter(|w| {
            let len = w.chars().count();
            len >= min_len && len <= max_len
        })
        .collect();
    if filtered.is_empty() {
        fallback_pool()
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_japanese_loads() {
        let list = WordList::builtin("japanese").unwrap();
        assert_eq!(list.name, "japanese");
        assert!(!list.words.is_empty());
        assert_eq!(list.size as usize, list.words.len());
    }

    #[test]
    fn test_builtin_english_loads() {
        let list = WordList::builtin("english").unwrap();
        assert!(!list.words.is_empty());
    }

    #[test]
    fn test_builtin_missing_is_none() {
        assert!(WordList::builtin("klingon").is_none());
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "# header comment").unwrap();
        writeln!(f, "neko").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "  inu  ").unwrap();
        drop(f);

        let list = WordList::from_file(&path).unwrap();
        assert_eq!(list.words, vec!["neko", "inu"]);
        assert_eq!(list.name, "words");
    }

    #[test]
    fn test_resolve_pool_filters_by_char_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, "a\nねこ\nさかな\ntoolongword\n").unwrap();

        let pool = resolve_pool(path.to_str().unwrap(), 2, 3);
        assert_eq!(pool, vec!["ねこ", "さかな"]);
    }

    #[test]
    fn test_resolve_pool_falls_back_on_missing_source() {
        let pool = resolve_pool("/no/such/file", 1, 32);
        assert_eq!(pool, fallback_pool());
    }

    #[test]
    fn test_resolve_pool_falls_back_on_empty_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.txt");
        fs::write(&path, "a\nb\n").unwrap();

        let pool = resolve_pool(path.to_str().unwrap(), 5, 10);
        assert_eq!(pool, fallback_pool());
    }

    #[test]
    fn test_builtin_words_within_default_lengths() {
        let list = WordList::builtin("japanese").unwrap();
        for word in &list.words {
            let len = word.chars().count();
            assert!((1..=32).contains(&len), "{word} out of range");
        }
    }
}
