//! # Special Tokens
//!
//! Reserved tokens which lead every [`crate::vocab::Vocabulary`].

use serde::{Deserialize, Serialize};

/// The padding token; always id 0.
pub const PAD_TOKEN: &str = "<pad>";

/// The unknown token.
pub const UNK_TOKEN: &str = "<unk>";

/// The sequence-start marker.
pub const SOS_TOKEN: &str = "<sos>";

/// The sequence-end marker.
pub const EOS_TOKEN: &str = "<eos>";

/// The reserved tokens of one vocabulary side.
///
/// Reserved tokens take the leading ids, in the order:
/// `pad`, `unk`, then `sos` and `eos` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// The padding token.
    pub pad: String,

    /// The unknown token.
    pub unk: String,

    /// The optional sequence-start marker.
    pub sos: Option<String>,

    /// The optional sequence-end marker.
    pub eos: Option<String>,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self::source()
    }
}

impl SpecialTokens {
    /// Specials for a source side: pad and unknown.
    pub fn source() -> Self {
        Self {
            pad: PAD_TOKEN.to_string(),
            unk: UNK_TOKEN.to_string(),
            sos: None,
            eos: None,
        }
    }

    /// Specials for a target side: pad, unknown, and the sequence markers.
    pub fn target() -> Self {
        Self::source().with_markers(true)
    }

    /// Enable or disable the sequence markers.
    pub fn with_markers(
        self,
        markers: bool,
    ) -> Self {
        if markers {
            Self {
                sos: Some(SOS_TOKEN.to_string()),
                eos: Some(EOS_TOKEN.to_string()),
                ..self
            }
        } else {
            Self {
                sos: None,
                eos: None,
                ..self
            }
        }
    }

    /// Does this side carry sequence markers?
    pub fn has_markers(&self) -> bool {
        self.sos.is_some() && self.eos.is_some()
    }

    /// The reserved tokens, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.pad.as_str()),
            Some(self.unk.as_str()),
            self.sos.as_deref(),
            self.eos.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Is `token` one of the reserved tokens?
    pub fn contains(
        &self,
        token: &str,
    ) -> bool {
        self.iter().any(|s| s == token)
    }
}
