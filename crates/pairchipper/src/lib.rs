//! # `pairchipper` Paired-Text Data Pipeline
//!
//! Prepares paired conversational text (an utterance and its reply) for
//! sequence-to-sequence training: normalization, vocabulary construction,
//! and token-budgeted, length-clustered mini-batching.
//!
//! See:
//! * [`normalize`] to turn raw text into token sequences.
//! * [`vocab`] to build, save, and load token vocabularies.
//! * [`corpus`] to load JSON-lines ``{"listen": .., "reply": ..}`` corpora.
//! * [`batching`] to plan and materialize padded mini-batches.
//! * [`epoch`] to drive reproducible multi-epoch iteration.
//!
//! ## Loading and Batching a Corpus
//!
//! ```rust,ignore
//! use pairchipper::{CorpusLoader, EpochDriver, PipelineOptions};
//!
//! type T = u32;
//!
//! let train = CorpusLoader::default().load_path::<T, _>("train.jsonl")?;
//! let test = CorpusLoader::default().load_path_with_vocabs(
//!     "test.jsonl",
//!     train.source_vocab().clone(),
//!     train.target_vocab().clone(),
//! )?;
//!
//! let options = PipelineOptions::training().with_token_budget(64).with_seed(7);
//! let mut driver = EpochDriver::new(train, options)?;
//! for batch in driver.epoch() {
//!     let (rows, width) = (batch.source.rows(), batch.source.width());
//!     // ...
//! }
//! ```
//!
//! ## Crate Features
//!
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod batching;
pub mod corpus;
pub mod epoch;
pub mod errors;
pub mod normalize;
pub mod options;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use batching::{Batch, BatchIter, PaddedGrid, make_batches};
#[doc(inline)]
pub use corpus::{Corpus, CorpusLoader, Example, length_sort_key};
#[doc(inline)]
pub use epoch::EpochDriver;
#[doc(inline)]
pub use errors::{PCResult, PairchipperError};
#[doc(inline)]
pub use normalize::{ChatNormalizer, TextNormalizer};
#[doc(inline)]
pub use options::PipelineOptions;
#[doc(inline)]
pub use types::{Sequence, Token, TokenType};
#[doc(inline)]
pub use vocab::{SpecialTokens, Vocabulary};
