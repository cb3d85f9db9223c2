//! # Error Types

/// Errors from pairchipper operations.
#[derive(Debug, thiserror::Error)]
pub enum PairchipperError {
    /// A corpus record could not be read as a source/target pair.
    ///
    /// This is always fatal to a load; malformed records are never skipped.
    #[error("data format error at line {line}: {message}")]
    DataFormat {
        /// The 1-based line number of the record.
        line: usize,

        /// What was wrong with the record.
        message: String,
    },

    /// Token id out of range for the vocabulary.
    #[error("token id {id} out of range for vocab of size {size}")]
    TokenOutOfRange {
        /// The offending id.
        id: usize,

        /// The size of the vocabulary.
        size: usize,
    },

    /// Vocabulary data is inconsistent.
    #[error("invalid vocab: {0}")]
    InvalidVocab(String),

    /// Pipeline options are unusable.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PairchipperError {
    /// Build a [`PairchipperError::DataFormat`] for a record line.
    pub fn data_format<S: Into<String>>(
        line: usize,
        message: S,
    ) -> Self {
        Self::DataFormat {
            line,
            message: message.into(),
        }
    }
}

/// Result type for pairchipper operations.
pub type PCResult<T> = core::result::Result<T, PairchipperError>;
