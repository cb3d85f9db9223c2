//! # Paired Corpora
//!
//! Loading JSON-lines ``{"listen": .., "reply": ..}`` corpora.
//!
//! * [`CorpusLoader`] - reads, validates, and tokenizes records;
//!   then builds the per-side vocabularies.
//! * [`Corpus`] - the loaded [`Example`]s and frozen vocabularies.
//! * [`PairRecord`] / [`SideConfig`] - record validation and side config.

mod corpus_loader;
mod example;
mod pair_record;
mod tokenized_corpus;

#[doc(inline)]
pub use corpus_loader::CorpusLoader;
#[doc(inline)]
pub use example::{Example, length_sort_key};
#[doc(inline)]
pub use pair_record::{DEFAULT_SOURCE_FIELD, DEFAULT_TARGET_FIELD, PairRecord, SideConfig};
#[doc(inline)]
pub use tokenized_corpus::{Corpus, CorpusStats};
