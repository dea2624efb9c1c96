//! CLI argument definitions using clap
//!
//! Commands:
//! - jsondb init --data-dir <path>
//! - jsondb tables --data-dir <path>
//! - jsondb query --data-dir <path> --table <name> [--where <expr>]...
//! - jsondb demo --data-dir <path>
//!
//! Every command accepts `--config <path>` in place of `--data-dir`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// jsondb - An embedded, file-backed JSON document store
#[derive(Parser, Debug)]
#[command(name = "jsondb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the store lives
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Path to configuration file
    #[arg(long, conflicts_with = "data_dir")]
    pub config: Option<PathBuf>,

    /// Data directory holding one JSON file per table
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory
    Init {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// List stored tables
    Tables {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the documents of a table matching every --where filter
    Query {
        #[command(flatten)]
        store: StoreArgs,

        /// Table name
        #[arg(long)]
        table: String,

        /// Primary key field of the table
        #[arg(long, default_value = "id")]
        primary_key: String,

        /// Filter such as `age>=18` or `name=Hello`; repeatable
        #[arg(long = "where", value_name = "EXPR")]
        filters: Vec<String>,

        /// Matches to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Maximum matches to print; 0 prints all
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },

    /// Run the users walkthrough against the store
    Demo {
        #[command(flatten)]
        store: StoreArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
