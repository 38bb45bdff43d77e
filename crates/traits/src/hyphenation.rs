//! Hyphenation seam.
//!
//! The line breaker asks a [`Hyphenator`] for the legal break points of a
//! single word and picks among them itself.

use std::collections::HashMap;
use std::fmt::Debug;

/// Break opportunities inside one word.
///
/// Break points are character offsets into the word, strictly inside it and
/// sorted ascending, so candidate `len() - 1` keeps the most text before the
/// hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyphenation {
    chars: Vec<char>,
    points: Vec<usize>,
}

impl Hyphenation {
    pub fn new(word: &str, mut points: Vec<usize>) -> Self {
        let chars: Vec<char> = word.chars().collect();
        points.retain(|p| *p > 0 && *p < chars.len());
        points.sort_unstable();
        points.dedup();
        Self { chars, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn break_point(&self, index: usize) -> Option<usize> {
        self.points.get(index).copied()
    }

    /// Text before break `index`, without the hyphen symbol.
    pub fn pre_text(&self, index: usize) -> String {
        self.points
            .get(index)
            .map(|p| self.chars[..*p].iter().collect())
            .unwrap_or_default()
    }

    pub fn post_text(&self, index: usize) -> String {
        self.points
            .get(index)
            .map(|p| self.chars[*p..].iter().collect())
            .unwrap_or_default()
    }
}

pub trait Hyphenator: Debug + Send + Sync {
    /// Returns `None` when the word cannot be hyphenated.
    fn hyphenate(&self, word: &str) -> Option<Hyphenation>;
}

/// Hyphenates from an explicit word list such as `"hy-phen-ation"`.
///
/// Lookups are case-insensitive; the returned break points refer to the word
/// as passed in.
#[derive(Debug, Clone)]
pub struct DictionaryHyphenator {
    entries: HashMap<String, Vec<usize>>,
    left_min: usize,
    right_min: usize,
}

impl Default for DictionaryHyphenator {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryHyphenator {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            left_min: 2,
            right_min: 2,
        }
    }

    /// Minimum number of characters kept before and after a break.
    pub fn with_limits(mut self, left_min: usize, right_min: usize) -> Self {
        self.left_min = left_min;
        self.right_min = right_min;
        self
    }

    /// Adds a word with `-` marking its break points.
    pub fn add(&mut self, pattern: &str) {
        let mut points = Vec::new();
        let mut word = String::new();
        for ch in pattern.chars() {
            if ch == '-' {
                points.push(word.chars().count());
            } else {
                word.push(ch);
            }
        }
        self.entries.insert(word.to_lowercase(), points);
    }

    pub fn with_words<'a>(mut self, patterns: impl IntoIterator<Item = &'a str>) -> Self {
        for pattern in patterns {
            self.add(pattern);
        }
        self
    }
}

impl Hyphenator for DictionaryHyphenator {
    fn hyphenate(&self, word: &str) -> Option<Hyphenation> {
        let points = self.entries.get(&word.to_lowercase())?;
        let len = word.chars().count();
        let allowed: Vec<usize> = points
            .iter()
            .copied()
            .filter(|p| *p >= self.left_min && len.saturating_sub(*p) >= self.right_min)
            .collect();
        let hyphenation = Hyphenation::new(word, allowed);
        (!hyphenation.is_empty()).then_some(hyphenation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_candidates_ascending() {
        let hyphenator = DictionaryHyphenator::new().with_words(["hy-phen-ation"]);
        let hyph = hyphenator.hyphenate("Hyphenation").unwrap();
        assert_eq!(hyph.len(), 2);
        assert_eq!(hyph.pre_text(0), "Hy");
        assert_eq!(hyph.pre_text(1), "Hyphen");
        assert_eq!(hyph.post_text(1), "ation");
    }

    #[test]
    fn test_limits_drop_short_fragments() {
        let hyphenator = DictionaryHyphenator::new()
            .with_limits(3, 3)
            .with_words(["a-bout"]);
        assert!(hyphenator.hyphenate("about").is_none());
    }
}
