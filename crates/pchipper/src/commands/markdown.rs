use std::io::Write;

use crate::{Args, input_output::OutputArgs};

/// Args for the markdown command.
#[derive(clap::Args, Debug)]
pub struct MarkdownArgs {
    #[command(flatten)]
    output: OutputArgs,
}

impl MarkdownArgs {
    /// Run the markdown command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = self.output.open_writer()?;
        write!(writer, "{}", clap_markdown::help_markdown::<Args>())?;
        writer.flush()?;
        Ok(())
    }
}
