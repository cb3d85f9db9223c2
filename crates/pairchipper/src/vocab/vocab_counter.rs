//! # Vocabulary Counter

use crate::{
    errors::PCResult,
    types::{PCHashMap, TokenType, hash_map_with_capacity},
    vocab::{SpecialTokens, Vocabulary},
};

/// Options for building a [`Vocabulary`] from a [`VocabCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyOptions {
    /// Tokens seen fewer times than this are left out.
    pub min_freq: usize,

    /// Maximum number of counted (non-reserved) tokens.
    pub max_size: Option<usize>,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            min_freq: 1,
            max_size: None,
        }
    }
}

impl VocabularyOptions {
    /// Set the minimum token frequency.
    pub fn with_min_freq(
        self,
        min_freq: usize,
    ) -> Self {
        Self { min_freq, ..self }
    }

    /// Set the maximum number of counted tokens.
    pub fn with_max_size<M: Into<Option<usize>>>(
        self,
        max_size: M,
    ) -> Self {
        Self {
            max_size: max_size.into(),
            ..self
        }
    }
}

/// Token occurrence counter.
///
/// Feed it every sequence of one corpus side, then [`VocabCounter::build`]
/// the frozen [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct VocabCounter {
    counts: PCHashMap<String, usize>,
}

impl Default for VocabCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabCounter {
    /// Create a new empty counter.
    pub fn new() -> Self {
        Self {
            counts: hash_map_with_capacity(10_000),
        }
    }

    /// The number of distinct tokens seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Has nothing been counted?
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The count for a token.
    pub fn count(
        &self,
        token: &str,
    ) -> usize {
        self.counts.get(token).copied().unwrap_or_default()
    }

    /// Count the tokens of one sequence.
    pub fn update_from_sequence<S: AsRef<str>>(
        &mut self,
        seq: &[S],
    ) {
        for token in seq {
            let token = token.as_ref();
            match self.counts.get_mut(token) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(token.to_string(), 1);
                }
            }
        }
    }

    /// Count the tokens of many sequences.
    pub fn update_from_sequences<I, Q, S>(
        &mut self,
        sequences: I,
    ) where
        I: IntoIterator<Item = Q>,
        Q: AsRef<[S]>,
        S: AsRef<str>,
    {
        for seq in sequences {
            self.update_from_sequence(seq.as_ref());
        }
    }

    /// The counted tokens in vocabulary order.
    ///
    /// Descending frequency, ties broken by ascending token;
    /// reserved tokens are left out.
    pub fn ordered_tokens(
        &self,
        specials: &SpecialTokens,
        options: &VocabularyOptions,
    ) -> Vec<&str> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .filter(|&(token, &count)| count >= options.min_freq && !specials.contains(token))
            .map(|(token, &count)| (token.as_str(), count))
            .collect();

        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        if let Some(max_size) = options.max_size {
            entries.truncate(max_size);
        }

        entries.into_iter().map(|(token, _)| token).collect()
    }

    /// Build the frozen vocabulary.
    ///
    /// ## Arguments
    /// * `specials` - the reserved tokens, which take the leading ids.
    /// * `options` - frequency / size limits.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn build<T: TokenType>(
        &self,
        specials: SpecialTokens,
        options: &VocabularyOptions,
    ) -> PCResult<Vocabulary<T>> {
        let mut itos: Vec<String> = specials.iter().map(str::to_string).collect();
        itos.extend(
            self.ordered_tokens(&specials, options)
                .into_iter()
                .map(str::to_string),
        );

        log::debug!(
            "Built vocab: {} counted tokens, {} total",
            self.len(),
            itos.len()
        );

        Vocabulary::from_itos(specials, itos)
    }
}

impl<T: TokenType> Vocabulary<T> {
    /// Build a vocabulary from every token of `sequences`.
    ///
    /// See [`VocabCounter::build`].
    pub fn build<I, Q, S>(
        sequences: I,
        specials: SpecialTokens,
        options: &VocabularyOptions,
    ) -> PCResult<Self>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut counter = VocabCounter::new();
        counter.update_from_sequences(sequences);
        counter.build(specials, options)
    }
}
