//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// JSON schema inference and normalization CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Codec options file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub options: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer a schema from a JSON Lines file and print it as JSON
    Infer {
        /// Input file, one JSON record per line
        #[arg(short, long)]
        input: PathBuf,

        /// Fraction of records to sample (overrides the options file)
        #[arg(long)]
        sampling_ratio: Option<f64>,

        /// Pretty-print the schema
        #[arg(long)]
        pretty: bool,
    },

    /// Decode every record under a schema and print each row re-encoded
    Normalize {
        /// Input file, one JSON record per line
        #[arg(short, long)]
        input: PathBuf,

        /// Schema file (JSON); inferred from the input when omitted
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
}
