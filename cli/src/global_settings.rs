use clap::{Arg, ArgMatches, arg};
use log::LevelFilter;

pub struct GlobalSettings {
    // Number of --verbose switches
    pub verbose: u8,

    // Print one interval (or one step) per line
    pub intervals: bool,
}

impl GlobalSettings {
    /// Return the command line switches to configure the global settings
    pub fn cli() -> impl IntoIterator<Item = Arg> {
        [
            arg!(-v --verbose ... "Show more logs, can be repeated")
                .global(true),
            arg!(--intervals "Print one interval or one step per line")
                .global(true),
        ]
    }

    /// Create the settings from the command line arguments
    pub fn new(args: &ArgMatches) -> Self {
        GlobalSettings {
            verbose: args.get_count("verbose"),
            intervals: args.get_flag("intervals"),
        }
    }

    /// The default log level, when RUST_LOG is not set
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
