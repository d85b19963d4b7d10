use crate::lexicon::LEXICON;
use crate::models::PlaceCandidate;

const MAX_PLACE_TOKENS: usize = 3;

/// Best-effort place name extraction from free text.
///
/// Stages run in priority order and the first one that yields a non-empty
/// candidate wins:
/// 1. trigger phrases ("going to X", "visit X", "in X", ...) over the lowercased text
/// 2. the first run of capitalized words in the original text
/// 3. the last word that is not a stopword
pub fn extract_place(text: &str) -> PlaceCandidate {
    let original = text.trim();
    if original.is_empty() {
        return PlaceCandidate::none();
    }

    let lower = original.to_lowercase();

    if let Some(candidate) = from_trigger_phrases(&lower) {
        return candidate;
    }

    if let Some(candidate) = from_capitalized_runs(original) {
        return candidate;
    }

    last_content_word(&lower)
}

/// Lowercase, strip punctuation, drop stopwords, keep at most three tokens and
/// title-case them. Returns the empty candidate when nothing survives.
pub fn normalize(candidate: &str) -> PlaceCandidate {
    let cleaned = strip_punctuation(&candidate.to_lowercase());
    let tokens = cleaned
        .split_whitespace()
        .filter(|token| !LEXICON.is_stopword(token))
        .take(MAX_PLACE_TOKENS)
        .map(title_case)
        .collect::<Vec<_>>();

    if tokens.is_empty() {
        PlaceCandidate::none()
    } else {
        PlaceCandidate::from_normalized(tokens.join(" "))
    }
}

fn from_trigger_phrases(lower: &str) -> Option<PlaceCandidate> {
    LEXICON.patterns.iter().find_map(|pattern| {
        let capture = pattern.captures(lower)?.get(1)?.as_str();
        let candidate = normalize(&cut_at_clause_break(capture));
        (!candidate.is_empty()).then_some(candidate)
    })
}

fn from_capitalized_runs(original: &str) -> Option<PlaceCandidate> {
    LEXICON
        .capitalized_run
        .find_iter(original)
        .map(|phrase| normalize(phrase.as_str()))
        .find(|candidate| !candidate.is_empty())
}

fn last_content_word(lower: &str) -> PlaceCandidate {
    strip_punctuation(lower)
        .split_whitespace()
        .filter(|token| !LEXICON.is_stopword(token))
        .last()
        .map(|token| PlaceCandidate::from_normalized(title_case(token)))
        .unwrap_or_else(PlaceCandidate::none)
}

fn cut_at_clause_break(capture: &str) -> String {
    capture
        .split_whitespace()
        .take_while(|token| !LEXICON.is_clause_break(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_punctuation(input: &str) -> String {
    input
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect()
}

/// Only one character is ever uppercased, even when the first letter expands
/// ('ß' becomes "Ss"), so a title-cased token survives another pass unchanged.
fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mut cased = String::with_capacity(token.len());
    cased.extend(upper.next());
    cased.extend(upper.flat_map(char::to_lowercase));
    cased.extend(chars.flat_map(char::to_lowercase));
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_after_going_to() {
        let text = "I'm going to go to bangalore, what is the temperature there and places to visit?";
        assert_eq!(extract_place(text).as_str(), "Bangalore");
    }

    #[test]
    fn specific_trigger_beats_later_visit() {
        let place = extract_place("plan my trip to Goa and then visit Mumbai");
        assert_eq!(place.as_str(), "Goa");
    }

    #[test]
    fn bare_in_is_the_last_resort_pattern() {
        assert_eq!(extract_place("weather in Pune").as_str(), "Pune");
        assert_eq!(
            extract_place("places to visit in Pondicherry").as_str(),
            "Pondicherry"
        );
    }

    #[test]
    fn keeps_up_to_three_tokens() {
        assert_eq!(extract_place("travel to new york city").as_str(), "New York");
        assert_eq!(
            extract_place("going to rio de janeiro brazil").as_str(),
            "Rio De Janeiro"
        );
    }

    #[test]
    fn falls_back_to_capitalized_phrase() {
        assert_eq!(
            extract_place("What about New Delhi?").as_str(),
            "New Delhi"
        );
    }

    #[test]
    fn falls_back_to_last_content_word() {
        assert_eq!(extract_place("weather jaipur please").as_str(), "Jaipur");
    }

    #[test]
    fn nothing_extractable_is_empty() {
        assert!(extract_place("").is_empty());
        assert!(extract_place("   ").is_empty());
        assert!(extract_place("what is the weather?").is_empty());
        assert!(extract_place("i want to go").is_empty());
    }

    #[test]
    fn normalize_strips_punctuation_and_stopwords() {
        assert_eq!(normalize("the city of Paris!!").as_str(), "Of Paris");
        assert_eq!(normalize("  SAN-francisco ").as_str(), "San Francisco");
        assert!(normalize("to the, in").is_empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "new delhi",
            "MUMBAI",
            "rio de janeiro brazil",
            "st. louis",
            "goa!",
            "ßalt",
        ] {
            let once = normalize(raw);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn expanding_uppercase_keeps_one_capital() {
        assert_eq!(normalize("ßalt").as_str(), "Ssalt");
        assert_eq!(normalize("Ssalt").as_str(), "Ssalt");
    }

    #[test]
    fn keeps_place_names_with_inner_particles() {
        assert_eq!(extract_place("weather in Stoke on Trent").as_str(), "Stoke On Trent");
        assert_eq!(extract_place("going to Clacton on Sea").as_str(), "Clacton On Sea");
        assert_eq!(extract_place("travel to Hay on Wye").as_str(), "Hay On Wye");
    }

    #[test]
    fn normalized_candidates_have_no_punctuation() {
        let place = extract_place("Going to St. John's, Newfoundland!");
        assert!(place
            .as_str()
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == ' '));
        assert!(place.as_str().split_whitespace().count() <= MAX_PLACE_TOKENS);
    }
}
