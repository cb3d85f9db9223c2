use std::io::Write;

use pairchipper::{Corpus, EpochDriver};

use crate::{
    input_output::OutputArgs,
    logging::LogArgs,
    pipeline_args::{CorpusArgs, PipelineArgs, T},
};

/// Args for the inspect command.
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Optional evaluation corpus; batched in evaluation mode.
    #[arg(long, default_value = None)]
    eval_corpus: Option<String>,

    /// Build separate vocabularies for the evaluation corpus,
    /// instead of reusing the training vocabularies.
    #[arg(long, requires = "eval_corpus")]
    independent_eval_vocab: bool,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl InspectArgs {
    /// Run the inspect command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let mut writer = self.output.open_writer()?;

        let train = self.corpus.load()?;
        report_corpus(&mut writer, "train", &train)?;

        let source_vocab = train.source_vocab().clone();
        let target_vocab = train.target_vocab().clone();

        let options = self.pipeline.options();
        let mut driver = EpochDriver::new(train, options.clone())?;
        report_epoch(&mut writer, "train", &mut driver)?;

        if let Some(path) = &self.eval_corpus {
            let loader = self.corpus.loader();
            let eval = if self.independent_eval_vocab {
                loader.load_path(path)?
            } else {
                loader.load_path_with_vocabs(path, source_vocab, target_vocab)?
            };
            report_corpus(&mut writer, "eval", &eval)?;

            let mut driver = EpochDriver::new(eval, options.with_training(false))?;
            report_epoch(&mut writer, "eval", &mut driver)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn report_corpus(
    writer: &mut dyn Write,
    name: &str,
    corpus: &Corpus<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = corpus.stats();
    writeln!(writer, "[{name}] records: {}", stats.records)?;
    writeln!(
        writer,
        "[{name}] empty sequences: source {}, target {}",
        stats.empty_source, stats.empty_target
    )?;
    writeln!(
        writer,
        "[{name}] tokens: source {} (max len {}), target {} (max len {})",
        stats.source_tokens, stats.max_source_len, stats.target_tokens, stats.max_target_len
    )?;

    let source_vocab = corpus.source_vocab();
    writeln!(
        writer,
        "[{name}] source vocab: size {}, pad id {}, unk id {}",
        source_vocab.len(),
        source_vocab.pad_id(),
        source_vocab.unk_id()
    )?;

    let target_vocab = corpus.target_vocab();
    writeln!(
        writer,
        "[{name}] target vocab: size {}, pad id {}, unk id {}, markers {}",
        target_vocab.len(),
        target_vocab.pad_id(),
        target_vocab.unk_id(),
        target_vocab.marker_len()
    )?;

    Ok(())
}

fn report_epoch(
    writer: &mut dyn Write,
    name: &str,
    driver: &mut EpochDriver<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let steps = driver.num_batches();

    let mut efficiency = 0.0;
    let mut rows = 0;
    let mut unknowns = (0, 0);
    for batch in driver.epoch() {
        efficiency += batch.padding_efficiency();
        rows += batch.len();
        unknowns.0 += batch.source_unknowns;
        unknowns.1 += batch.target_unknowns;
    }

    writeln!(writer, "[{name}] steps per epoch: {steps}")?;
    if steps > 0 {
        writeln!(
            writer,
            "[{name}] mean rows per batch: {:.2}",
            rows as f64 / steps as f64
        )?;
        writeln!(
            writer,
            "[{name}] mean padding efficiency: {:.3}",
            efficiency / steps as f64
        )?;
    }
    writeln!(
        writer,
        "[{name}] unknown substitutions: source {}, target {}",
        unknowns.0, unknowns.1
    )?;

    Ok(())
}
