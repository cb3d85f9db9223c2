mod batches;
mod inspect;
mod markdown;
mod tokenize;
mod vocab;

/// Subcommands for pchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Normalize lines of text into tokens.
    Tokenize(tokenize::TokenizeArgs),

    /// Load a corpus and report vocabulary, length, and batching stats.
    Inspect(inspect::InspectArgs),

    /// Write the batches of one epoch as JSON lines.
    Batches(batches::BatchesArgs),

    /// Build and save the source and target vocabularies of a corpus.
    Vocab(vocab::VocabArgs),

    /// Print the CLI reference as markdown.
    Markdown(markdown::MarkdownArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Tokenize(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
            Commands::Batches(cmd) => cmd.run(),
            Commands::Vocab(cmd) => cmd.run(),
            Commands::Markdown(cmd) => cmd.run(),
        }
    }
}
