//! Closed word lists that drive place extraction and intent classification.
//!
//! Everything here is compiled once on first use and never mutated.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Trigger phrases tried in order, most specific first. The bare `in` must stay
/// last: it matches almost anything.
pub const TRIGGER_PHRASES: &[&str] = &[
    "going to",
    "go to",
    "travel to",
    "plan my trip to",
    "plan trip to",
    "thinking to go to",
    "thinking of visiting",
    "visit",
    "places in",
    "in",
];

pub const STOPWORDS: &[&str] = &[
    "what", "we", "i", "you", "there", "next", "week", "trip", "plan", "planning",
    "temperature", "weather", "maybe", "thinking", "should", "pack", "my", "to", "in",
    "visit", "go", "going", "lets", "let", "and", "or", "is", "the", "it", "im", "for",
    "about", "please", "places", "place", "city", "want",
];

/// Connectives that end a trigger capture, so "to goa and then visit mumbai"
/// yields "goa".
/// Prepositions such as "on" stay out of this list: they occur inside names
/// like "Stoke on Trent".
pub const CLAUSE_BREAKS: &[&str] = &[
    "and", "or", "then", "but", "during", "this", "next", "tomorrow", "today", "tonight",
    "what", "how", "where", "when", "which",
];

pub const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "hot", "cold"];

pub const PLACES_KEYWORDS: &[&str] = &["places", "place", "visit", "tourist", "attractions"];

pub const TRIP_PLANNING_PHRASES: &[&str] = &["plan my trip", "plan trip"];

pub struct Lexicon {
    pub patterns: Vec<Regex>,
    pub capitalized_run: Regex,
    stopwords: HashSet<&'static str>,
    clause_breaks: HashSet<&'static str>,
}

impl Lexicon {
    fn build() -> Self {
        let patterns = TRIGGER_PHRASES
            .iter()
            .map(|phrase| {
                let trigger = phrase.split_whitespace().collect::<Vec<_>>().join(r"\s+");
                Regex::new(&format!(r"\b{trigger}\s+([a-z\s]+)")).expect("valid trigger regex")
            })
            .collect();

        Self {
            patterns,
            capitalized_run: Regex::new(r"\b[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*\b")
                .expect("valid capitalized-run regex"),
            stopwords: STOPWORDS.iter().copied().collect(),
            clause_breaks: CLAUSE_BREAKS.iter().copied().collect(),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn is_clause_break(&self, token: &str) -> bool {
        self.clause_breaks.contains(token)
    }
}

pub static LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::build);

pub(crate) fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_pattern_per_trigger() {
        assert_eq!(LEXICON.patterns.len(), TRIGGER_PHRASES.len());
        assert_eq!(TRIGGER_PHRASES.last(), Some(&"in"));
    }

    #[test]
    fn name_particles_do_not_break_clauses() {
        for particle in ["on", "by", "from", "with", "de", "upon"] {
            assert!(!LEXICON.is_clause_break(particle), "{particle} breaks a clause");
        }
        assert!(LEXICON.is_clause_break("and"));
        assert!(LEXICON.is_clause_break("then"));
    }

    #[test]
    fn stopwords_are_lowercase() {
        assert!(STOPWORDS.iter().all(|word| word.to_lowercase() == *word));
    }
}
