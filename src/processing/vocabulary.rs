//! Compiled phrase vocabularies for substring membership tests

use crate::error::{Result, ScreenerError};
use aho_corasick::AhoCorasick;

/// A fixed vocabulary compiled into a single Aho-Corasick automaton.
///
/// Patterns are stored lower-cased and matched against text the caller has
/// already lower-cased, so an entry is "present" exactly when its normalized
/// form is a substring of the normalized text. Matching is overlapping: a
/// short entry such as `sql` is still reported inside `postgresql`.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    automaton: Option<AhoCorasick>,
    entries: Vec<String>,
}

impl PhraseSet {
    /// Compile `entries`, keeping their display casing. Blank entries and
    /// case-insensitive duplicates are dropped; first occurrence wins.
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut display = Vec::with_capacity(entries.len());
        let mut patterns: Vec<String> = Vec::with_capacity(entries.len());

        for entry in entries {
            let trimmed = entry.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let pattern = trimmed.to_lowercase();
            if patterns.contains(&pattern) {
                continue;
            }
            patterns.push(pattern);
            display.push(trimmed.to_string());
        }

        let automaton = if patterns.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&patterns).map_err(|e| {
                ScreenerError::Vocabulary(format!("Failed to build phrase matcher: {}", e))
            })?)
        };

        Ok(Self {
            automaton,
            entries: display,
        })
    }

    /// Indices of entries present in `haystack`, ascending (vocabulary order).
    pub fn matched_indices(&self, haystack: &str) -> Vec<usize> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };

        let mut seen = vec![false; self.entries.len()];
        for mat in automaton.find_overlapping_iter(haystack) {
            seen[mat.pattern().as_usize()] = true;
        }

        seen.iter()
            .enumerate()
            .filter_map(|(idx, hit)| hit.then_some(idx))
            .collect()
    }

    /// Display strings of entries present in `haystack`, in vocabulary order.
    pub fn matches(&self, haystack: &str) -> Vec<&str> {
        self.matched_indices(haystack)
            .into_iter()
            .map(|idx| self.entries[idx].as_str())
            .collect()
    }

    pub fn contains_any(&self, haystack: &str) -> bool {
        self.automaton
            .as_ref()
            .is_some_and(|automaton| automaton.is_match(haystack))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
