use std::io::{BufRead, Write};

use pairchipper::TextNormalizer;

use crate::{
    input_output::{InputArgs, OutputArgs},
    pipeline_args::NormalizerArgs,
};

/// Args for the tokenize command.
#[derive(clap::Args, Debug)]
pub struct TokenizeArgs {
    #[command(flatten)]
    normalizer: NormalizerArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl TokenizeArgs {
    /// Run the tokenize command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        run_tokenize(&mut reader, &mut writer, &self.normalizer.normalizer)
    }
}

fn run_tokenize(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    normalizer: &dyn TextNormalizer,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let tokens = normalizer.tokenize(&line?);
        writeln!(writer, "{}", tokens.join(" "))?;
        writer.flush()?;
    }
    Ok(())
}
