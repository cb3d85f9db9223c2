//! # Text Normalizer Trait

use crate::types::Sequence;

/// A strategy for turning raw utterance text into a [`Sequence`] of tokens.
///
/// Implementations must be deterministic and pure; the
/// [`crate::corpus::CorpusLoader`] may call them from any thread.
///
/// Any `Fn(&str) -> Sequence` closure is also a `TextNormalizer`.
pub trait TextNormalizer: Send + Sync {
    /// Tokenize `text` into a (possibly empty) sequence of non-empty tokens.
    fn tokenize(
        &self,
        text: &str,
    ) -> Sequence;
}

impl<F> TextNormalizer for F
where
    F: Fn(&str) -> Sequence + Send + Sync,
{
    fn tokenize(
        &self,
        text: &str,
    ) -> Sequence {
        self(text)
    }
}

/// Normalizer which lower-cases and splits on whitespace; nothing else.
///
/// Useful for corpora which are already tokenized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitNormalizer;

impl TextNormalizer for SplitNormalizer {
    fn tokenize(
        &self,
        text: &str,
    ) -> Sequence {
        text.to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_normalizer() {
        let n = SplitNormalizer;
        assert_eq!(n.tokenize("  Hello   World\t"), vec!["hello", "world"]);
        assert!(n.tokenize("").is_empty());
    }

    #[test]
    fn test_closure_normalizer() {
        let n = |text: &str| -> Sequence { text.chars().map(|c| c.to_string()).collect() };
        assert_eq!(n.tokenize("ab"), vec!["a", "b"]);

        let boxed: Box<dyn TextNormalizer> = Box::new(n);
        assert_eq!(boxed.tokenize("xy"), vec!["x", "y"]);
    }
}
