//! # Text Normalization
//!
//! Turns raw utterance text into [`crate::types::Sequence`]s of tokens.
//!
//! * [`TextNormalizer`] - the normalization strategy trait.
//! * [`ChatNormalizer`] - the default conversational English normalizer.
//! * [`SplitNormalizer`] - lower-case and whitespace split only.

pub mod chat_normalizer;
pub mod text_normalizer;

#[doc(inline)]
pub use chat_normalizer::ChatNormalizer;
#[doc(inline)]
pub use text_normalizer::{SplitNormalizer, TextNormalizer};
