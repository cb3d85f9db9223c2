use stderrlog::{LogLevelNum, Timestamp};

/// Crates whose log records are shown.
const LOG_MODULES: [&str; 2] = ["pairchipper", "pchipper"];

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Raise verbosity above the command's default (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable timestamped logging.
    #[clap(short, long)]
    pub ts: bool,

    /// Prefix log records with their module path.
    #[clap(long)]
    pub show_modules: bool,
}

impl LogArgs {
    /// Install the stderr logger.
    ///
    /// `default` is the command's base verbosity (2 is warn, 3 is info);
    /// each `-v` raises it one level.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let log_level = match default.saturating_add(self.verbose) {
            0 => LogLevelNum::Off,
            1 => LogLevelNum::Error,
            2 => LogLevelNum::Warn,
            3 => LogLevelNum::Info,
            4 => LogLevelNum::Debug,
            _ => LogLevelNum::Trace,
        };

        stderrlog::new()
            .modules(LOG_MODULES)
            .quiet(self.quiet)
            .verbosity(log_level)
            .show_module_names(self.show_modules)
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}
