//! # Paired Examples

use serde::{Deserialize, Serialize};

use crate::types::Sequence;

/// One tokenized corpus record: a (source, target) sequence pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Example {
    /// The source ("listen") side.
    pub source: Sequence,

    /// The target ("reply") side.
    pub target: Sequence,
}

impl Example {
    /// Create a new example.
    pub fn new(
        source: Sequence,
        target: Sequence,
    ) -> Self {
        Self { source, target }
    }

    /// The number of source tokens.
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// The number of target tokens.
    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// The default batching sort key: ``(source_len, target_len)``.
    pub fn length_key(&self) -> (usize, usize) {
        (self.source_len(), self.target_len())
    }
}

/// The default batching sort key; see [`Example::length_key`].
pub fn length_sort_key(example: &Example) -> (usize, usize) {
    example.length_key()
}
