//! # Token Vocabulary ``{ String <-> T }``

use crate::{
    errors::{PCResult, PairchipperError},
    types::{PCHashMap, Sequence, TokenType, hash_map_with_capacity, token_from_index},
    vocab::SpecialTokens,
};

/// A frozen bidirectional token vocabulary.
///
/// Ids are dense, ``0..len()``; the reserved [`SpecialTokens`] take the
/// leading ids, and the pad token is always id 0.
///
/// There is no mutating API; a vocabulary is built once
/// (see [`crate::vocab::VocabCounter`]) and then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary<T: TokenType> {
    specials: SpecialTokens,
    stoi: PCHashMap<String, T>,
    itos: Vec<String>,
    unk_id: T,
    sos_id: Option<T>,
    eos_id: Option<T>,
}

impl<T: TokenType> Vocabulary<T> {
    /// Build a vocabulary from an id-ordered token list.
    ///
    /// ## Arguments
    /// * `specials` - the reserved tokens; each must be present.
    /// * `itos` - the tokens, in id order.
    ///
    /// ## Returns
    /// An error if the pad token is not at id 0, a reserved token is missing,
    /// a token is duplicated or empty, or the size overflows `T`.
    pub fn from_itos(
        specials: SpecialTokens,
        itos: Vec<String>,
    ) -> PCResult<Self> {
        if itos.is_empty() {
            return Err(PairchipperError::InvalidVocab("empty vocab".to_string()));
        }
        if itos.len() > 1 {
            token_from_index::<T>(itos.len() - 1).ok_or_else(|| {
                PairchipperError::InvalidVocab(format!(
                    "vocab size ({}) exceeds token type capacity",
                    itos.len()
                ))
            })?;
        }
        if itos[0] != specials.pad {
            return Err(PairchipperError::InvalidVocab(format!(
                "pad token {:?} must have id 0, found {:?}",
                specials.pad, itos[0]
            )));
        }

        let mut stoi: PCHashMap<String, T> = hash_map_with_capacity(itos.len());
        for (idx, token) in itos.iter().enumerate() {
            if token.is_empty() {
                return Err(PairchipperError::InvalidVocab(format!(
                    "empty token at id {idx}"
                )));
            }
            // Size was checked above.
            let id = token_from_index::<T>(idx).unwrap_or_default();
            if stoi.insert(token.clone(), id).is_some() {
                return Err(PairchipperError::InvalidVocab(format!(
                    "duplicate token {token:?}"
                )));
            }
        }

        let resolve = |token: &str| -> PCResult<T> {
            stoi.get(token).copied().ok_or_else(|| {
                PairchipperError::InvalidVocab(format!("missing special token {token:?}"))
            })
        };
        let unk_id = resolve(&specials.unk)?;
        let sos_id = specials.sos.as_deref().map(resolve).transpose()?;
        let eos_id = specials.eos.as_deref().map(resolve).transpose()?;

        Ok(Self {
            specials,
            stoi,
            itos,
            unk_id,
            sos_id,
            eos_id,
        })
    }

    /// The reserved tokens.
    pub fn specials(&self) -> &SpecialTokens {
        &self.specials
    }

    /// The number of tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.itos.len()
    }

    /// Is the vocabulary empty?
    ///
    /// Always false; the pad token is always present.
    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    /// The pad token id; always 0.
    pub fn pad_id(&self) -> T {
        T::zero()
    }

    /// The unknown token id.
    pub fn unk_id(&self) -> T {
        self.unk_id
    }

    /// The sequence-start id, if this side has markers.
    pub fn sos_id(&self) -> Option<T> {
        self.sos_id
    }

    /// The sequence-end id, if this side has markers.
    pub fn eos_id(&self) -> Option<T> {
        self.eos_id
    }

    /// The number of marker slots [`Self::encode_with_markers`] adds.
    pub fn marker_len(&self) -> usize {
        usize::from(self.sos_id.is_some()) + usize::from(self.eos_id.is_some())
    }

    /// The tokens, in id order.
    pub fn itos(&self) -> &[String] {
        &self.itos
    }

    /// Look up the id of a token.
    pub fn lookup_token(
        &self,
        token: &str,
    ) -> Option<T> {
        self.stoi.get(token).copied()
    }

    /// Look up the token for an id.
    pub fn lookup_id(
        &self,
        id: T,
    ) -> Option<&str> {
        id.to_usize()
            .and_then(|idx| self.itos.get(idx))
            .map(String::as_str)
    }

    /// Encode a sequence; absent tokens map to [`Self::unk_id`].
    pub fn encode<S: AsRef<str>>(
        &self,
        seq: &[S],
    ) -> Vec<T> {
        self.encode_counting(seq).0
    }

    /// Encode a sequence, also counting unknown substitutions.
    ///
    /// ## Returns
    /// ``(ids, unknown_count)``
    pub fn encode_counting<S: AsRef<str>>(
        &self,
        seq: &[S],
    ) -> (Vec<T>, usize) {
        let mut ids = Vec::with_capacity(seq.len() + self.marker_len());
        let unknowns = self.extend_encoded(&mut ids, seq);
        (ids, unknowns)
    }

    /// Encode a sequence wrapped in the sequence markers, when present.
    ///
    /// ## Returns
    /// ``(ids, unknown_count)``
    pub fn encode_with_markers<S: AsRef<str>>(
        &self,
        seq: &[S],
    ) -> (Vec<T>, usize) {
        let mut ids = Vec::with_capacity(seq.len() + self.marker_len());
        ids.extend(self.sos_id);
        let unknowns = self.extend_encoded(&mut ids, seq);
        ids.extend(self.eos_id);
        (ids, unknowns)
    }

    fn extend_encoded<S: AsRef<str>>(
        &self,
        ids: &mut Vec<T>,
        seq: &[S],
    ) -> usize {
        let mut unknowns = 0;
        ids.extend(seq.iter().map(|token| match self.lookup_token(token.as_ref()) {
            Some(id) => id,
            None => {
                unknowns += 1;
                self.unk_id
            }
        }));
        unknowns
    }

    /// Decode ids back into a sequence.
    ///
    /// ## Returns
    /// An error for any id outside ``0..len()``.
    pub fn decode(
        &self,
        ids: &[T],
    ) -> PCResult<Sequence> {
        ids.iter()
            .map(|&id| {
                self.lookup_id(id)
                    .map(str::to_string)
                    .ok_or_else(|| PairchipperError::TokenOutOfRange {
                        id: id.to_usize().unwrap_or(usize::MAX),
                        size: self.len(),
                    })
            })
            .collect()
    }
}
