//! Word-list profanity matcher.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::adapter::ProfanityMatcher;
use crate::error::ClassifierError;
use crate::text::words;

const BUILTIN_WORDS: &str = include_str!("../data/profanity.txt");

/// Matches whole words, case-insensitively, against a fixed list.
#[derive(Debug, Clone)]
pub struct WordListMatcher {
    words: HashSet<String>,
}

impl WordListMatcher {
    /// Matcher backed by the built-in word list.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_WORDS)
    }

    /// Load a newline-separated word list; blank lines and `#` comments are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ClassifierError::WordList {
                path: path.to_path_buf(),
                source,
            })?;
        let matcher = Self::parse(&contents);
        info!(path = %path.display(), words = matcher.len(), "Loaded profanity word list");
        Ok(matcher)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    fn parse(contents: &str) -> Self {
        Self::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ProfanityMatcher for WordListMatcher {
    fn contains_profanity(&self, text: &str) -> Result<bool, ClassifierError> {
        let lowered = text.to_lowercase();
        let found = words(&lowered).any(|w| self.words.contains(w));
        Ok(found)
    }
}
