use clap::Parser;
use log::LevelFilter;

/// pipemin - split a minimum across two processes
///
/// Generates 20 random values, forks, lets parent and child each take the
/// minimum of one half, and sends the child's result to the parent over a
/// pipe. The run itself is fixed; the only option controls diagnostics.
#[derive(Parser, Debug)]
#[command(
    name = "pipemin",
    version,
    about = "Two-process minimum over a pipe",
    long_about = "Forks once and computes the minimum of a random 20-element array.\n\
                  The parent reduces indices 0..9, the child reduces 10..19 and writes its\n\
                  result to a pipe; the parent combines both and waits for the child."
)]
pub struct Cli {
    /// Be verbose about what you're doing (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Get the verbosity level
    pub fn verbosity_level(&self) -> u8 {
        self.verbose
    }

    /// Log level for the stderr diagnostics
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}
