//! # Pipeline Options
//!
//! The immutable configuration record passed to the batching pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::{PCResult, PairchipperError};

/// The default per-batch token budget.
pub const DEFAULT_TOKEN_BUDGET: usize = 32;

/// The default super-chunk factor; super-chunks hold
/// ``chunk_factor * token_budget`` examples.
pub const DEFAULT_CHUNK_FACTOR: usize = 100;

/// The default maximum sequence length hint.
pub const DEFAULT_MAX_LEN: usize = 25;

/// The default number of epochs.
pub const DEFAULT_EPOCHS: usize = 200;

/// Options for the batching pipeline.
///
/// `device` and `max_len` are pass-through values for the
/// training collaborator; the pipeline does not interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Upper bound on the projected padded cost of a batch.
    pub token_budget: usize,

    /// Super-chunk size, in multiples of `token_budget`.
    pub chunk_factor: usize,

    /// Device / placement hint.
    pub device: String,

    /// Training (randomized bucketing) or evaluation (deterministic) mode.
    pub training: bool,

    /// Shuffle batch order in training mode.
    pub shuffle: bool,

    /// Maximum permitted sequence length hint.
    pub max_len: usize,

    /// Number of epochs.
    pub epochs: usize,

    /// Random seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            token_budget: DEFAULT_TOKEN_BUDGET,
            chunk_factor: DEFAULT_CHUNK_FACTOR,
            device: "cpu".to_string(),
            training: true,
            shuffle: true,
            max_len: DEFAULT_MAX_LEN,
            epochs: DEFAULT_EPOCHS,
            seed: None,
        }
    }
}

impl PipelineOptions {
    /// Default training options.
    pub fn training() -> Self {
        Self::default()
    }

    /// Default evaluation options: no training, no shuffle.
    pub fn evaluation() -> Self {
        Self {
            training: false,
            shuffle: false,
            ..Self::default()
        }
    }

    /// Set the token budget.
    pub fn with_token_budget(
        self,
        token_budget: usize,
    ) -> Self {
        Self {
            token_budget,
            ..self
        }
    }

    /// Set the super-chunk factor.
    pub fn with_chunk_factor(
        self,
        chunk_factor: usize,
    ) -> Self {
        Self {
            chunk_factor,
            ..self
        }
    }

    /// Set the device hint.
    pub fn with_device<S: Into<String>>(
        self,
        device: S,
    ) -> Self {
        Self {
            device: device.into(),
            ..self
        }
    }

    /// Set training mode.
    pub fn with_training(
        self,
        training: bool,
    ) -> Self {
        Self { training, ..self }
    }

    /// Set the shuffle flag.
    pub fn with_shuffle(
        self,
        shuffle: bool,
    ) -> Self {
        Self { shuffle, ..self }
    }

    /// Set the maximum sequence length hint.
    pub fn with_max_len(
        self,
        max_len: usize,
    ) -> Self {
        Self { max_len, ..self }
    }

    /// Set the epoch count.
    pub fn with_epochs(
        self,
        epochs: usize,
    ) -> Self {
        Self { epochs, ..self }
    }

    /// Set the random seed.
    pub fn with_seed<S: Into<Option<u64>>>(
        self,
        seed: S,
    ) -> Self {
        Self {
            seed: seed.into(),
            ..self
        }
    }

    /// The number of examples per training super-chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_factor.saturating_mul(self.token_budget)
    }

    /// Will batch order be shuffled?
    ///
    /// Only training mode shuffles.
    pub fn shuffles(&self) -> bool {
        self.training && self.shuffle
    }

    /// Check the options are usable.
    pub fn validate(&self) -> PCResult<()> {
        if self.token_budget == 0 {
            return Err(PairchipperError::InvalidOptions(
                "token_budget must be > 0".to_string(),
            ));
        }
        if self.chunk_factor == 0 {
            return Err(PairchipperError::InvalidOptions(
                "chunk_factor must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
