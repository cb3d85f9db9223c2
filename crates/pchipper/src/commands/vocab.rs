use pairchipper::vocab::io::save_vocab_path;

use crate::{logging::LogArgs, pipeline_args::CorpusArgs};

/// Args for the vocab command.
#[derive(clap::Args, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Source vocabulary output file.
    #[arg(long)]
    source_out: String,

    /// Target vocabulary output file.
    #[arg(long)]
    target_out: String,

    #[clap(flatten)]
    logging: LogArgs,
}

impl VocabArgs {
    /// Run the vocab command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let corpus = self.corpus.load()?;

        log::info!(
            "source vocab: {} tokens -> {}",
            corpus.source_vocab().len(),
            self.source_out
        );
        save_vocab_path(corpus.source_vocab().as_ref(), &self.source_out)?;

        log::info!(
            "target vocab: {} tokens -> {}",
            corpus.target_vocab().len(),
            self.target_out
        );
        save_vocab_path(corpus.target_vocab().as_ref(), &self.target_out)?;

        Ok(())
    }
}
