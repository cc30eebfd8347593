//! Search-intent detection.
//!
//! Before a message is treated as a normal chat turn, scan it against a fixed
//! list of natural-language trigger phrases. First match wins over the ordered
//! list; the substring after the matched phrase is the search topic. No match
//! means the message proceeds down the ordinary chat path.

/// Ordered trigger phrases. Longer variants come before their prefixes so the
/// topic never starts with a leftover preposition.
const TRIGGER_PHRASES: &[&str] = &[
    "find papers about",
    "find papers on",
    "search for papers about",
    "search for papers on",
    "find research on",
    "search for research on",
    "search for research",
    "look up papers on",
];

/// Extract a search topic from a chat message, if it expresses search intent.
pub fn search_intent(message: &str) -> Option<String> {
    let lower = message.to_lowercase();

    for phrase in TRIGGER_PHRASES {
        if let Some(index) = lower.find(phrase) {
            // Index into the lowercased copy: byte offsets can drift from the
            // original once non-ASCII case folding is involved.
            let topic = lower[index + phrase.len()..]
                .trim()
                .trim_end_matches(['.', '!', '?'])
                .trim();
            if topic.is_empty() {
                return None;
            }
            return Some(topic.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_topic_after_trigger() {
        assert_eq!(
            search_intent("find papers about quantum computing").as_deref(),
            Some("quantum computing")
        );
    }

    #[test]
    fn plain_question_has_no_intent() {
        assert!(search_intent("what is quantum computing").is_none());
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(
            search_intent("Find Papers About dark matter halos?").as_deref(),
            Some("dark matter halos")
        );
    }

    #[test]
    fn trigger_may_appear_mid_sentence() {
        assert_eq!(
            search_intent("could you search for research on protein folding").as_deref(),
            Some("protein folding")
        );
    }

    #[test]
    fn first_matching_phrase_wins() {
        // "search for papers on" must match before the bare "search for research"
        assert_eq!(
            search_intent("search for papers on gravity waves").as_deref(),
            Some("gravity waves")
        );
    }

    #[test]
    fn empty_topic_is_not_an_intent() {
        assert!(search_intent("find papers about").is_none());
        assert!(search_intent("find papers about ?!").is_none());
    }

    #[test]
    fn trailing_punctuation_is_trimmed() {
        assert_eq!(
            search_intent("find research on exoplanet atmospheres!").as_deref(),
            Some("exoplanet atmospheres")
        );
    }
}
