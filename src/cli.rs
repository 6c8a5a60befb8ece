use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// File integrity monitor for a watched directory
#[derive(Parser, Debug)]
#[command(name = "dirsentry", version, about, long_about = None)]
pub struct Cli {
    /// Directory whose files are monitored
    #[arg(long = "dir", value_name = "PATH", default_value = "./secure_files")]
    pub directory: PathBuf,

    /// Baseline database file
    #[arg(long, value_name = "PATH", default_value = "hash_db.toml")]
    pub baseline: PathBuf,

    /// Event log file
    #[arg(long, value_name = "PATH", default_value = "security.log")]
    pub log: PathBuf,

    /// Increase diagnostic verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the baseline from the watched directory's current contents
    Init,

    /// Check the watched directory against the baseline and log a session
    Check,

    /// Summarize the most recent check session from the event log
    Report,

    /// Serve the read-only web dashboard
    Serve {
        /// Address to bind
        #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:5000")]
        bind: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
