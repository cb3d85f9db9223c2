use std::io::Write;

use pairchipper::EpochDriver;

use crate::{
    input_output::OutputArgs,
    logging::LogArgs,
    pipeline_args::{CorpusArgs, PipelineArgs},
};

/// Args for the batches command.
#[derive(clap::Args, Debug)]
pub struct BatchesArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Which epoch to write; 1-based.
    #[arg(long, default_value_t = 1)]
    epoch: usize,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl BatchesArgs {
    /// Run the batches command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        if self.epoch == 0 {
            return Err("--epoch is 1-based".into());
        }

        let corpus = self.corpus.load()?;
        let mut driver = EpochDriver::new(corpus, self.pipeline.options())?;

        // Earlier epochs are planned, not materialized, to advance the shuffle.
        for _ in 1..self.epoch {
            let _ = driver.epoch();
        }

        let mut writer = self.output.open_writer()?;
        let mut count = 0;
        for batch in driver.epoch() {
            serde_json::to_writer(&mut writer, &batch)?;
            writeln!(writer)?;
            count += 1;
        }
        writer.flush()?;

        log::info!(
            "epoch {}: wrote {} batches to {}",
            self.epoch,
            count,
            self.output.describe()
        );

        Ok(())
    }
}
