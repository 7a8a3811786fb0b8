use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install missing language packs, then translate the input
    Run {
        /// Where the text comes from (auto, file)
        #[arg(long)]
        source: Option<String>,

        /// How the language is detected (detector, heuristic)
        #[arg(long)]
        detection: Option<String>,
    },

    /// Install missing Russian/English language packs
    Setup,

    /// List installed languages
    Languages,

    /// Print the translation direction chosen for a text
    Detect {
        /// Text to classify
        text: String,

        /// How the language is detected (detector, heuristic)
        #[arg(long)]
        detection: Option<String>,
    },

    /// Write the default configuration to a file
    Init {
        /// Output configuration file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}
