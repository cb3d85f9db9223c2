//! # Corpus Loader

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use crate::{
    corpus::{Corpus, CorpusStats, Example, PairRecord, SideConfig},
    errors::{PCResult, PairchipperError},
    normalize::{ChatNormalizer, TextNormalizer},
    types::TokenType,
    vocab::{VocabCounter, Vocabulary, VocabularyOptions},
};

/// Loads JSON-lines paired corpora into a [`Corpus`].
///
/// The normalizer is a strategy parameter; [`ChatNormalizer`] by default.
#[derive(Debug, Clone)]
pub struct CorpusLoader<N: TextNormalizer = ChatNormalizer> {
    normalizer: N,
    source: SideConfig,
    target: SideConfig,
    vocab_options: VocabularyOptions,
}

impl Default for CorpusLoader<ChatNormalizer> {
    fn default() -> Self {
        Self::new(ChatNormalizer)
    }
}

impl<N: TextNormalizer> CorpusLoader<N> {
    /// Create a loader with the default side configs.
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            source: SideConfig::source(),
            target: SideConfig::target(),
            vocab_options: VocabularyOptions::default(),
        }
    }

    /// Replace the normalizer.
    pub fn with_normalizer<M: TextNormalizer>(
        self,
        normalizer: M,
    ) -> CorpusLoader<M> {
        CorpusLoader {
            normalizer,
            source: self.source,
            target: self.target,
            vocab_options: self.vocab_options,
        }
    }

    /// Set the source side config.
    pub fn with_source(
        self,
        source: SideConfig,
    ) -> Self {
        Self { source, ..self }
    }

    /// Set the target side config.
    pub fn with_target(
        self,
        target: SideConfig,
    ) -> Self {
        Self { target, ..self }
    }

    /// Set the vocabulary build options.
    pub fn with_vocab_options(
        self,
        vocab_options: VocabularyOptions,
    ) -> Self {
        Self {
            vocab_options,
            ..self
        }
    }

    /// The normalizer.
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// The source side config.
    pub fn source(&self) -> &SideConfig {
        &self.source
    }

    /// The target side config.
    pub fn target(&self) -> &SideConfig {
        &self.target
    }

    /// Load a corpus file, building independent source and target vocabularies.
    pub fn load_path<T, P>(
        &self,
        path: P,
    ) -> PCResult<Corpus<T>>
    where
        T: TokenType,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading corpus: {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        self.read_corpus(reader)
    }

    /// Read a corpus, building independent source and target vocabularies.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, reader)))]
    pub fn read_corpus<T, R>(
        &self,
        reader: R,
    ) -> PCResult<Corpus<T>>
    where
        T: TokenType,
        R: BufRead,
    {
        let (examples, stats) = self.read_examples(reader)?;

        let mut source_counter = VocabCounter::new();
        let mut target_counter = VocabCounter::new();
        for example in &examples {
            source_counter.update_from_sequence(&example.source);
            target_counter.update_from_sequence(&example.target);
        }

        let source_vocab: Vocabulary<T> =
            source_counter.build(self.source.specials.clone(), &self.vocab_options)?;
        let target_vocab: Vocabulary<T> =
            target_counter.build(self.target.specials.clone(), &self.vocab_options)?;

        log::info!(
            "Vocab sizes: source {}, target {}",
            source_vocab.len(),
            target_vocab.len()
        );

        Ok(Corpus::new(
            examples,
            Arc::new(source_vocab),
            Arc::new(target_vocab),
            stats,
        ))
    }

    /// Load a corpus file, reusing frozen vocabularies.
    ///
    /// Use this for evaluation splits, so their ids agree
    /// with the training split's.
    pub fn load_path_with_vocabs<T, P>(
        &self,
        path: P,
        source_vocab: Arc<Vocabulary<T>>,
        target_vocab: Arc<Vocabulary<T>>,
    ) -> PCResult<Corpus<T>>
    where
        T: TokenType,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading corpus with shared vocabs: {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        self.read_corpus_with_vocabs(reader, source_vocab, target_vocab)
    }

    /// Read a corpus, reusing frozen vocabularies.
    pub fn read_corpus_with_vocabs<T, R>(
        &self,
        reader: R,
        source_vocab: Arc<Vocabulary<T>>,
        target_vocab: Arc<Vocabulary<T>>,
    ) -> PCResult<Corpus<T>>
    where
        T: TokenType,
        R: BufRead,
    {
        let (examples, stats) = self.read_examples(reader)?;
        Ok(Corpus::new(examples, source_vocab, target_vocab, stats))
    }

    /// Read and tokenize every record.
    ///
    /// Blank lines are skipped; any malformed record, including one which
    /// is not valid UTF-8, is a fatal [`PairchipperError::DataFormat`].
    pub fn read_examples<R: BufRead>(
        &self,
        reader: R,
    ) -> PCResult<(Vec<Example>, CorpusStats)> {
        let mut examples = Vec::new();
        let mut stats = CorpusStats::default();

        for (idx, bytes) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let mut bytes = bytes?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let line = String::from_utf8(bytes).map_err(|e| {
                PairchipperError::data_format(line_no, format!("invalid UTF-8: {e}"))
            })?;
            if line.trim().is_empty() {
                log::debug!("line {line_no}: skipping blank line");
                continue;
            }

            let record =
                PairRecord::parse_line(&line, line_no, &self.source.field, &self.target.field)?;
            let example = self.tokenize_record(&record);

            if example.source.is_empty() {
                log::warn!("line {line_no}: empty source sequence");
            }
            if example.target.is_empty() {
                log::warn!("line {line_no}: empty target sequence");
            }
            stats.observe(&example);

            examples.push(example);
        }

        log::info!(
            "Read {} records ({} empty source, {} empty target)",
            stats.records,
            stats.empty_source,
            stats.empty_target
        );

        Ok((examples, stats))
    }

    /// Tokenize both sides of a record.
    pub fn tokenize_record(
        &self,
        record: &PairRecord,
    ) -> Example {
        Example::new(
            self.normalizer.tokenize(&record.source),
            self.normalizer.tokenize(&record.target),
        )
    }
}
