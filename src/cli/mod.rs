//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "geosift",
    version,
    about = "Multi-aspect retrieval and ranking for geological well documents",
    long_about = "Geosift ingests extracted well-document text, splits each document into labeled \
                  sections, embeds every section alongside the full text, and answers queries with \
                  a weighted fusion of vector similarity, keyword overlap, and a synonym-aware \
                  semantic signal."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/geosift/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest extracted document text into the knowledge base
    Ingest {
        /// Files to ingest (plain text, one document per file)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat each file as JSON Lines, one {text, metadata} record per line
        #[arg(long)]
        jsonl: bool,
    },

    /// Rank stored documents against a query
    Search {
        /// Query text
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Scoring mode: hybrid, vector, or keyword
        #[arg(short, long, default_value = "hybrid")]
        mode: String,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show knowledge base statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Show only a specific section
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
