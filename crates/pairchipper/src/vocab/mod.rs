//! # Vocabulary
//!
//! Bidirectional ``{ String <-> T }`` token vocabularies.
//!
//! * [`Vocabulary`] - the frozen token/id mapping.
//! * [`VocabCounter`] - counts corpus tokens and builds a [`Vocabulary`].
//! * [`SpecialTokens`] - the reserved tokens leading every vocabulary;
//!   pad is always id 0.
//! * [`io`] - plain text vocab files.

pub mod io;
pub mod special_tokens;
pub mod vocab_counter;
pub mod vocabulary;

#[doc(inline)]
pub use special_tokens::{EOS_TOKEN, PAD_TOKEN, SOS_TOKEN, SpecialTokens, UNK_TOKEN};
#[doc(inline)]
pub use vocab_counter::{VocabCounter, VocabularyOptions};
#[doc(inline)]
pub use vocabulary::Vocabulary;
