//! CLI module for jsondb
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - tables: List stored tables
//! - query: Filter a table and print matching documents
//! - demo: Run the users walkthrough

mod args;
mod commands;
mod demo;
mod errors;
mod io;

pub use args::{Cli, Command, StoreArgs};
pub use commands::{init, query, run, run_command, store_config, tables, QueryOptions};
pub use demo::User;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_line, write_response};
