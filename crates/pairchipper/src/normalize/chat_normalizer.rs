//! # Chat Normalizer
//!
//! The default [`TextNormalizer`] for conversational English.
//!
//! Rules, applied in order:
//! 1. lower-case;
//! 2. split off ``+++`` delimited head/tail segments as opaque tokens;
//! 3. expand contractions ([`CONTRACTIONS`]);
//! 4. replace the [`STRIP_CLASS`] characters with spaces, and collapse spaces;
//! 5. isolate runs of ``. ! , ? $ #`` as single tokens;
//! 6. split on whitespace;
//! 7. trim the quotes from tokens which contain more than one ``'``.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{normalize::TextNormalizer, types::Sequence};

/// The delimiter separating opaque head/tail segments from the body.
pub const SEGMENT_DELIMITER: &str = "+++";

/// Ordered contraction expansions.
///
/// These are literal substitutions, applied one pass each, in order;
/// so ``won't`` must precede the generic ``n't``.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("what's", "what is"),
    ("where's", "where is"),
    ("how's", "how is"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'re", " are"),
    ("'d", " would"),
    ("won't", "will not"),
    ("can't", "cannot"),
    ("n't", " not"),
    ("n'", "ng"),
    ("'bout", "about"),
    ("'til", "until"),
];

/// Character class replaced by a single space.
pub const STRIP_CLASS: &str = r#"[*"“”\n\\…+\-/=()‘•:\[\]|’;]"#;

static STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRIP_CLASS).expect("STRIP_CLASS is a valid pattern"));

static SPACES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ]+").expect("spaces pattern is valid"));

static ISOLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.+|!+|,+|\?+|\$+|#+").expect("isolate pattern is valid")
});

/// The default conversational [`TextNormalizer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChatNormalizer;

impl ChatNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Split ``head+++body+++tail`` into its parts.
    ///
    /// Without a delimiter, the whole text is the body.
    /// With delimiters, the body is the first middle segment;
    /// which is empty when there is exactly one delimiter.
    fn split_segments(text: &str) -> (Option<&str>, &str, Option<&str>) {
        if !text.contains(SEGMENT_DELIMITER) {
            return (None, text, None);
        }

        let parts: Vec<&str> = text.split(SEGMENT_DELIMITER).collect();
        let head = parts.first().copied().filter(|s| !s.is_empty());
        let tail = parts.last().copied().filter(|s| !s.is_empty());
        let body = if parts.len() > 2 { parts[1] } else { "" };

        (head, body, tail)
    }

    /// Apply the contraction expansions to `text`.
    pub fn expand_contractions(text: &str) -> String {
        let mut text = text.to_string();
        for (pattern, replacement) in CONTRACTIONS {
            if text.contains(pattern) {
                text = text.replace(pattern, replacement);
            }
        }
        text
    }

    /// Tokenize an already lower-cased body segment.
    fn tokenize_body(body: &str) -> Sequence {
        let text = Self::expand_contractions(body);
        let text = STRIP_REGEX.replace_all(&text, " ");
        let text = SPACES_REGEX.replace_all(&text, " ");
        let text = ISOLATE_REGEX.replace_all(&text, |caps: &Captures| {
            // The class is all ASCII; the first byte is the whole char.
            format!(" {} ", &caps[0][..1])
        });

        text.split_whitespace()
            .filter_map(|word| {
                let word = if word.matches('\'').count() > 1 {
                    word.trim_matches('\'')
                } else {
                    word
                };
                (!word.is_empty()).then(|| word.to_string())
            })
            .collect()
    }
}

impl TextNormalizer for ChatNormalizer {
    fn tokenize(
        &self,
        text: &str,
    ) -> Sequence {
        let text = text.to_lowercase();
        let (head, body, tail) = Self::split_segments(&text);

        let mut tokens = Vec::new();
        if let Some(head) = head {
            tokens.push(head.to_string());
        }
        tokens.extend(Self::tokenize_body(body));
        if let Some(tail) = tail {
            tokens.push(tail.to_string());
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str) -> Vec<String> {
        ChatNormalizer.tokenize(text)
    }

    #[test]
    fn test_contractions_and_punctuation() {
        assert_eq!(
            tok("I'm fine, aren't you?"),
            vec!["i", "am", "fine", ",", "are", "not", "you", "?"]
        );
        assert_eq!(tok("I won't go"), vec!["i", "will", "not", "go"]);
        assert_eq!(tok("You can't"), vec!["you", "cannot"]);
        assert_eq!(tok("we'll've"), vec!["we", "will", "have"]);
        assert_eq!(tok("they're"), vec!["they", "are"]);
        assert_eq!(tok("she'd"), vec!["she", "would"]);
        assert_eq!(tok("what's up"), vec!["what", "is", "up"]);
        assert_eq!(tok("goin' 'bout it"), vec!["going", "about", "it"]);
        assert_eq!(tok("wait 'til then"), vec!["wait", "until", "then"]);
    }

    #[test]
    fn test_punctuation_runs_collapse() {
        assert_eq!(tok("what?!?"), vec!["what", "?", "!", "?"]);
        assert_eq!(tok("no..."), vec!["no", "."]);
        assert_eq!(tok("$5 #1"), vec!["$", "5", "#", "1"]);
        assert_eq!(tok("a,,b"), vec!["a", ",", "b"]);
    }

    #[test]
    fn test_strip_class() {
        assert_eq!(
            tok("\"Hello\" (there) - you: [yes]; a/b"),
            vec!["hello", "there", "you", "yes", "a", "b"]
        );
        assert_eq!(tok("line one\nline two"), vec!["line", "one", "line", "two"]);
        assert_eq!(tok("“smart” ‘quotes’"), vec!["smart", "quotes"]);
    }

    #[test]
    fn test_apostrophe_trim() {
        // More than one apostrophe: trimmed.
        assert_eq!(tok("'quoted'"), vec!["quoted"]);
        // Exactly one: kept.
        assert_eq!(tok("o'clock"), vec!["o'clock"]);
        // Only apostrophes: dropped.
        assert!(tok("''").is_empty());
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            tok("Alice+++Hi there+++Bob"),
            vec!["alice", "hi", "there", "bob"]
        );
        // Head/tail are opaque; not re-tokenized.
        assert_eq!(
            tok("Mr. X+++hello!+++the end"),
            vec!["mr. x", "hello", "!", "the end"]
        );
        // Empty head/tail segments are skipped.
        assert_eq!(tok("+++body+++"), vec!["body"]);
        // A single delimiter has no body.
        assert_eq!(tok("left+++right"), vec!["left", "right"]);
        // Only the first middle segment is the body.
        assert_eq!(tok("a+++b+++c+++d"), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(tok("").is_empty());
        assert!(tok("   ").is_empty());
        assert!(tok("***").is_empty());
    }

    #[test]
    fn test_expand_contractions_order() {
        assert_eq!(ChatNormalizer::expand_contractions("won't"), "will not");
        assert_eq!(ChatNormalizer::expand_contractions("don't"), "do not");
        assert_eq!(ChatNormalizer::expand_contractions("it's"), "it is");
    }

    proptest::proptest! {
        #[test]
        fn proptest_tokenize_is_deterministic(text in "\\PC{0,64}") {
            let a = tok(&text);
            let b = tok(&text);
            proptest::prop_assert_eq!(&a, &b);
        }

        #[test]
        fn proptest_tokens_are_non_empty(text in "[a-zA-Z' .,!?+#$]{0,64}") {
            for token in tok(&text) {
                proptest::prop_assert!(!token.is_empty());
            }
        }
    }
}
