//! Forbidden words.

use coven_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Words that get a message deleted.
///
/// Loaded from JSON of the form `{"words": ["..."]}`. Matching is a
/// case-sensitive substring test; empty entries are ignored.
///
/// # Examples
///
/// ```
/// use coven_core::Blacklist;
///
/// let blacklist = Blacklist::from_json(r#"{"words": ["spam"]}"#).unwrap();
/// assert!(blacklist.matches("buy spam now"));
/// assert!(!blacklist.matches("hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    #[serde(default)]
    words: Vec<String>,
}

impl Blacklist {
    /// Build from a word list.
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(Into::into)
                .filter(|w: &String| !w.is_empty())
                .collect(),
        }
    }

    /// Parse the JSON word list.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let parsed: Blacklist = serde_json::from_str(json)
            .map_err(|e| ConfigError::load("blacklist JSON", e))?;
        Ok(Self::new(parsed.words))
    }

    /// Read and parse a JSON word list file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::load(path.display().to_string(), e))?;
        Self::from_json(&json)
    }

    /// Whether `content` contains any forbidden word.
    pub fn matches(&self, content: &str) -> bool {
        self.words.iter().any(|word| content.contains(word.as_str()))
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
