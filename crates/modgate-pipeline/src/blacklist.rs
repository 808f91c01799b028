//! Forbidden-term matching over generated tags.

use std::collections::{BTreeSet, HashSet};

use crate::text::words;

/// Terms whose presence in the tags forces an adult verdict.
pub const BLACKLIST_TERMS: &[&str] = &["duck", "утка"];

/// Case-insensitive, whole-word term matcher.
#[derive(Debug, Clone)]
pub struct Blacklist {
    // Ordered so the reported term is deterministic when several match.
    terms: BTreeSet<String>,
}

impl Blacklist {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Return the first forbidden term present in the tags, if any.
    pub fn check(&self, tags: &[String]) -> Option<String> {
        if tags.is_empty() {
            return None;
        }

        let lowered = tags.join(" ").to_lowercase();
        let present: HashSet<&str> = words(&lowered).collect();
        self.terms
            .iter()
            .find(|term| present.contains(term.as_str()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::new(BLACKLIST_TERMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_default_terms() {
        let blacklist = Blacklist::default();
        assert_eq!(blacklist.len(), 2);
        assert_eq!(
            blacklist.check(&tags(&["duck", "pond"])),
            Some("duck".to_string())
        );
        assert_eq!(
            blacklist.check(&tags(&["белая", "утка"])),
            Some("утка".to_string())
        );
    }

    #[test]
    fn test_whole_word_only() {
        let blacklist = Blacklist::default();
        assert_eq!(blacklist.check(&tags(&["ducks", "duckling"])), None);
    }

    #[test]
    fn test_case_insensitive() {
        let blacklist = Blacklist::new(["Duck"]);
        assert_eq!(blacklist.check(&tags(&["DUCK"])), Some("duck".to_string()));
    }

    #[test]
    fn test_empty_tags_never_match() {
        assert_eq!(Blacklist::default().check(&[]), None);
    }

    #[test]
    fn test_first_term_in_order_wins() {
        let blacklist = Blacklist::new(["zebra", "apple"]);
        assert_eq!(
            blacklist.check(&tags(&["zebra", "apple"])),
            Some("apple".to_string())
        );
    }
}
