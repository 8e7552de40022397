//! Text preprocessing and sentence segmentation

use regex::Regex;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;
use verity_domain::traits::SentenceSegmenter;

/// URLs, @mentions and #hashtags
static NOISE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"http\S+|www\.\S+|@\S+|#\S+").ok());

/// Strip URLs, mentions and hashtags, then trim
pub fn clean_text(text: &str) -> String {
    match NOISE_RE.as_ref() {
        Some(noise) => noise.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Sentence segmenter following Unicode sentence boundaries (UAX #29)
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_noise() {
        let cleaned = clean_text("  Read this http://x.co/abc now @bob #facts www.example.com ");
        assert_eq!(cleaned, "Read this  now");
    }

    #[test]
    fn test_clean_text_keeps_plain_text() {
        assert_eq!(clean_text("The sky is blue."), "The sky is blue.");
    }

    #[test]
    fn test_segment_two_sentences() {
        let sentences = RuleSegmenter.segment("The Eiffel Tower is in Paris. I love sunny days.");
        assert_eq!(
            sentences,
            vec!["The Eiffel Tower is in Paris.", "I love sunny days."]
        );
    }

    #[test]
    fn test_segment_questions_and_exclamations() {
        let sentences = RuleSegmenter.segment("Is this working? Yes it is! Great.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn test_segment_empty_and_whitespace() {
        assert!(RuleSegmenter.segment("").is_empty());
        assert!(RuleSegmenter.segment("   \n ").is_empty());
    }

    #[test]
    fn test_segment_without_terminal_punctuation() {
        assert_eq!(
            RuleSegmenter.segment("No ending punctuation here"),
            vec!["No ending punctuation here"]
        );
    }
}
