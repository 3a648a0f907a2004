//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ripline",
    version,
    about = "Rip discs with makemkvcon and encode the titles with HandBrakeCLI."
)]
pub struct Args {
    /// Comma separated disc indexes to rip (e.g. 0,1,2)
    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    pub discs: Vec<u32>,

    /// Create a configuration file interactively
    #[arg(short, long, default_value_t = false)]
    pub configure: bool,

    /// Print the resolved configuration and exit
    #[arg(short, long, default_value_t = false)]
    pub read_config: bool,

    /// List drives with a disc inserted and exit
    #[arg(short, long, default_value_t = false)]
    pub list: bool,

    /// Configuration file to use instead of the search path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log progress details to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Requested disc indexes, sorted and without duplicates.
    pub fn disc_ids(&self) -> Vec<u32> {
        let mut ids = self.discs.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
