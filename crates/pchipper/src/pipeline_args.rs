use std::sync::Arc;

use pairchipper::{
    ChatNormalizer,
    Corpus,
    CorpusLoader,
    PipelineOptions,
    Sequence,
    TextNormalizer,
    Vocabulary,
    corpus::{DEFAULT_SOURCE_FIELD, DEFAULT_TARGET_FIELD, SideConfig},
    normalize::SplitNormalizer,
    options::{DEFAULT_CHUNK_FACTOR, DEFAULT_EPOCHS, DEFAULT_MAX_LEN, DEFAULT_TOKEN_BUDGET},
    vocab::{VocabularyOptions, io::load_vocab_path},
};

/// Token id type used by the CLI.
pub type T = u32;

/// Text normalizer selection.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum NormalizerMode {
    /// Conversational English: contractions, punctuation, "+++" segments.
    #[default]
    Chat,

    /// Lower-case and whitespace split only.
    Split,
}

impl TextNormalizer for NormalizerMode {
    fn tokenize(
        &self,
        text: &str,
    ) -> Sequence {
        match self {
            NormalizerMode::Chat => ChatNormalizer.tokenize(text),
            NormalizerMode::Split => SplitNormalizer.tokenize(text),
        }
    }
}

/// Normalizer arg group.
#[derive(clap::Args, Debug)]
pub struct NormalizerArgs {
    /// Text normalizer.
    #[arg(long, value_enum, default_value_t = NormalizerMode::Chat)]
    pub normalizer: NormalizerMode,
}

/// Corpus loading arg group.
#[derive(clap::Args, Debug)]
pub struct CorpusArgs {
    /// Training corpus; one JSON record per line.
    pub corpus: String,

    #[command(flatten)]
    pub normalizer: NormalizerArgs,

    /// Source text field.
    #[arg(long, default_value = DEFAULT_SOURCE_FIELD)]
    pub source_field: String,

    /// Target text field.
    #[arg(long, default_value = DEFAULT_TARGET_FIELD)]
    pub target_field: String,

    /// Minimum token frequency for vocabulary entry.
    #[arg(long, default_value_t = 1)]
    pub min_freq: usize,

    /// Maximum number of counted tokens per vocabulary.
    #[arg(long, default_value = None)]
    pub max_vocab: Option<usize>,

    /// Saved source vocabulary; skips the source vocabulary build.
    #[arg(long, default_value = None, requires = "target_vocab")]
    pub source_vocab: Option<String>,

    /// Saved target vocabulary; skips the target vocabulary build.
    #[arg(long, default_value = None, requires = "source_vocab")]
    pub target_vocab: Option<String>,
}

impl CorpusArgs {
    /// Build the configured loader.
    pub fn loader(&self) -> CorpusLoader<NormalizerMode> {
        CorpusLoader::new(self.normalizer.normalizer)
            .with_source(SideConfig::source().with_field(self.source_field.clone()))
            .with_target(SideConfig::target().with_field(self.target_field.clone()))
            .with_vocab_options(
                VocabularyOptions::default()
                    .with_min_freq(self.min_freq)
                    .with_max_size(self.max_vocab),
            )
    }

    /// Load the training corpus.
    ///
    /// Saved vocabularies are reused when given; otherwise both
    /// vocabularies are built from the corpus.
    pub fn load(&self) -> Result<Corpus<T>, Box<dyn std::error::Error>> {
        let loader = self.loader();

        let corpus = match (&self.source_vocab, &self.target_vocab) {
            (Some(source_path), Some(target_path)) => {
                let source_vocab: Vocabulary<T> =
                    load_vocab_path(source_path, loader.source().specials.clone())?;
                let target_vocab: Vocabulary<T> =
                    load_vocab_path(target_path, loader.target().specials.clone())?;
                loader.load_path_with_vocabs(
                    &self.corpus,
                    Arc::new(source_vocab),
                    Arc::new(target_vocab),
                )?
            }
            _ => loader.load_path(&self.corpus)?,
        };

        Ok(corpus)
    }
}

/// Batching pipeline arg group.
#[derive(clap::Args, Debug)]
pub struct PipelineArgs {
    /// Per-batch token budget.
    #[arg(long, default_value_t = DEFAULT_TOKEN_BUDGET)]
    pub token_budget: usize,

    /// Super-chunk size, as a multiple of the token budget.
    #[arg(long, default_value_t = DEFAULT_CHUNK_FACTOR)]
    pub chunk_factor: usize,

    /// Evaluation mode: one global sort, fixed order.
    #[arg(long)]
    pub eval: bool,

    /// Keep training batches in super-chunk order.
    #[arg(long)]
    pub no_shuffle: bool,

    /// Shuffle seed; random when unset.
    #[arg(long, default_value = None)]
    pub seed: Option<u64>,

    /// Device hint, passed through.
    #[arg(long, default_value = "cpu")]
    pub device: String,

    /// Max sequence length hint, passed through.
    #[arg(long, default_value_t = DEFAULT_MAX_LEN)]
    pub max_len: usize,

    /// Number of epochs.
    #[arg(long, default_value_t = DEFAULT_EPOCHS)]
    pub epochs: usize,
}

impl PipelineArgs {
    /// The configured pipeline options.
    pub fn options(&self) -> PipelineOptions {
        let base = if self.eval {
            PipelineOptions::evaluation()
        } else {
            PipelineOptions::training().with_shuffle(!self.no_shuffle)
        };

        base.with_token_budget(self.token_budget)
            .with_chunk_factor(self.chunk_factor)
            .with_seed(self.seed)
            .with_device(self.device.clone())
            .with_max_len(self.max_len)
            .with_epochs(self.epochs)
    }
}
