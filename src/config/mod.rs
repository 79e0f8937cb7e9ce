//! Engine configuration.
//!
//! A small JSON document with two recognized fields: an array of words the
//! engine must never decompose, and a string of custom unit characters used
//! by the grouping and separator passes. Loading is fail-open: a missing
//! file, bad encoding, or malformed document degrades to empty defaults so
//! the caller is never aborted by configuration problems.

use crate::global;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const EXCLUDE_WORDS_KEY: &str = "exclude_words";
const UNIT_CHARS_KEY: &str = "unit_chars";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Words never decomposed into numeral runs, even when they contain
    /// numeral characters.
    pub exclude_words: Vec<String>,
    /// Counter/unit characters recognized after a digit sequence.
    pub unit_chars: String,
}

impl Config {
    /// Load the configuration, falling back to defaults on any failure.
    pub fn load() -> Self {
        let path = Self::config_path();
        let config = Self::load_from(&path);
        info!(
            exclude_words = config.exclude_words.len(),
            unit_chars = config.unit_chars.chars().count(),
            "Loaded engine configuration"
        );
        config
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    "Configuration file not readable at {:?} ({}), using defaults",
                    path, err
                );
                return Self::default();
            }
        };

        // Tolerate a UTF-8 byte-order mark from Windows editors
        let document = content.trim_start_matches('\u{feff}');

        let value: Value = match serde_json::from_str(document) {
            Ok(value) => value,
            Err(err) => {
                error!("Configuration at {:?} is not valid JSON: {}", path, err);
                return Self::default();
            }
        };

        let mut config = Self::default();

        match value.get(EXCLUDE_WORDS_KEY) {
            Some(Value::Array(items)) => {
                config.exclude_words = items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
            }
            Some(other) => error!(
                "{} must be an array of strings, found {}",
                EXCLUDE_WORDS_KEY,
                json_type_name(other)
            ),
            None => error!("{} is missing from the configuration", EXCLUDE_WORDS_KEY),
        }

        match value.get(UNIT_CHARS_KEY) {
            Some(Value::String(chars)) => config.unit_chars = chars.clone(),
            Some(other) => error!(
                "{} must be a string, found {}",
                UNIT_CHARS_KEY,
                json_type_name(other)
            ),
            None => error!("{} is missing from the configuration", UNIT_CHARS_KEY),
        }

        config.dedup();
        config
    }

    /// Preferred config location, falling back to the working directory the
    /// way the original tool read its settings next to the executable.
    fn config_path() -> PathBuf {
        match global::config_file() {
            Ok(path) if path.exists() => path,
            _ => PathBuf::from(global::CONFIG_FILENAME),
        }
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.exclude_words.retain(|word| seen.insert(word.clone()));

        let mut seen_chars = HashSet::new();
        self.unit_chars = self
            .unit_chars
            .chars()
            .filter(|ch| seen_chars.insert(*ch))
            .collect();
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_document() {
        let file = write_config(r#"{"exclude_words": ["十八番"], "unit_chars": "回月日"}"#);
        let config = Config::load_from(file.path());
        assert_eq!(config.exclude_words, vec!["十八番"]);
        assert_eq!(config.unit_chars, "回月日");
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/kansuji_configs.json"));
        assert!(config.exclude_words.is_empty());
        assert!(config.unit_chars.is_empty());
    }

    #[test]
    fn test_load_malformed_json_defaults() {
        let file = write_config("{not json");
        let config = Config::load_from(file.path());
        assert!(config.exclude_words.is_empty());
        assert!(config.unit_chars.is_empty());
    }

    #[test]
    fn test_wrong_field_type_degrades_per_field() {
        let file = write_config(r#"{"exclude_words": "oops", "unit_chars": "回"}"#);
        let config = Config::load_from(file.path());
        assert!(config.exclude_words.is_empty());
        assert_eq!(config.unit_chars, "回");
    }

    #[test]
    fn test_duplicates_are_removed() {
        let file =
            write_config(r#"{"exclude_words": ["一回", "一回", "二回"], "unit_chars": "回回月"}"#);
        let config = Config::load_from(file.path());
        assert_eq!(config.exclude_words, vec!["一回", "二回"]);
        assert_eq!(config.unit_chars, "回月");
    }

    #[test]
    fn test_bom_is_tolerated() {
        let file = write_config("\u{feff}{\"exclude_words\": [], \"unit_chars\": \"回\"}");
        let config = Config::load_from(file.path());
        assert_eq!(config.unit_chars, "回");
    }
}
