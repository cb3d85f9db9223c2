//! # Tokenized Corpus

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{corpus::Example, types::TokenType, vocab::Vocabulary};

/// Summary statistics of a loaded corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Number of records read.
    pub records: usize,

    /// Records whose source sequence is empty.
    pub empty_source: usize,

    /// Records whose target sequence is empty.
    pub empty_target: usize,

    /// Total source tokens.
    pub source_tokens: usize,

    /// Total target tokens.
    pub target_tokens: usize,

    /// Longest source sequence.
    pub max_source_len: usize,

    /// Longest target sequence.
    pub max_target_len: usize,
}

impl CorpusStats {
    /// Account for one example.
    pub fn observe(
        &mut self,
        example: &Example,
    ) {
        let (src, tgt) = example.length_key();
        self.records += 1;
        self.empty_source += usize::from(src == 0);
        self.empty_target += usize::from(tgt == 0);
        self.source_tokens += src;
        self.target_tokens += tgt;
        self.max_source_len = self.max_source_len.max(src);
        self.max_target_len = self.max_target_len.max(tgt);
    }
}

/// A tokenized corpus with its frozen vocabularies.
///
/// The vocabularies are shared behind [`Arc`]s so an evaluation
/// split may reuse a training split's vocabularies.
#[derive(Debug, Clone)]
pub struct Corpus<T: TokenType> {
    examples: Vec<Example>,
    source_vocab: Arc<Vocabulary<T>>,
    target_vocab: Arc<Vocabulary<T>>,
    stats: CorpusStats,
}

impl<T: TokenType> Corpus<T> {
    /// Assemble a corpus.
    pub fn new(
        examples: Vec<Example>,
        source_vocab: Arc<Vocabulary<T>>,
        target_vocab: Arc<Vocabulary<T>>,
        stats: CorpusStats,
    ) -> Self {
        Self {
            examples,
            source_vocab,
            target_vocab,
            stats,
        }
    }

    /// The examples, in file order.
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// The number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Is the corpus empty?
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// The source vocabulary.
    pub fn source_vocab(&self) -> &Arc<Vocabulary<T>> {
        &self.source_vocab
    }

    /// The target vocabulary.
    pub fn target_vocab(&self) -> &Arc<Vocabulary<T>> {
        &self.target_vocab
    }

    /// The load statistics.
    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    /// Release the parts of the corpus.
    pub fn into_parts(self) -> (Vec<Example>, Arc<Vocabulary<T>>, Arc<Vocabulary<T>>) {
        (self.examples, self.source_vocab, self.target_vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(
        src: usize,
        tgt: usize,
    ) -> Example {
        Example::new(vec!["s".to_string(); src], vec!["t".to_string(); tgt])
    }

    #[test]
    fn test_stats_observe() {
        let mut stats = CorpusStats::default();
        stats.observe(&ex(3, 0));
        stats.observe(&ex(0, 2));
        stats.observe(&ex(1, 5));

        assert_eq!(
            stats,
            CorpusStats {
                records: 3,
                empty_source: 1,
                empty_target: 1,
                source_tokens: 4,
                target_tokens: 7,
                max_source_len: 3,
                max_target_len: 5,
            }
        );
    }
}
