//! CLI command implementations
//!
//! Each command resolves a [`StoreConfig`], opens the store and writes
//! JSON lines to the given writer.

use std::io::{self, Write};

use serde_json::json;

use crate::config::StoreConfig;
use crate::query::Expression;
use crate::store::Store;

use super::args::{Command, StoreArgs};
use super::demo;
use super::errors::{CliError, CliResult};
use super::io::{write_line, write_response};

/// Arguments of `jsondb query`
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub table: String,
    pub primary_key: String,
    pub filters: Vec<String>,
    pub offset: usize,
    pub limit: usize,
}

/// Main CLI entry point
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli.command, &mut out)
}

/// Run the appropriate command based on CLI args
pub fn run_command<W: Write>(cmd: Command, out: &mut W) -> CliResult<()> {
    match cmd {
        Command::Init { store } => init(&store, out),
        Command::Tables { store } => tables(&store, out),
        Command::Query {
            store,
            table,
            primary_key,
            filters,
            offset,
            limit,
        } => {
            let options = QueryOptions {
                table,
                primary_key,
                filters,
                offset,
                limit,
            };
            query(&store, &options, out)
        }
        Command::Demo { store } => {
            let store = Store::open(&store_config(&store)?)?;
            demo::run(&store, out)
        }
    }
}

/// `--config` wins; otherwise `--data-dir` with default settings
pub fn store_config(args: &StoreArgs) -> CliResult<StoreConfig> {
    match (&args.config, &args.data_dir) {
        (Some(path), _) => Ok(StoreConfig::load(path)?),
        (None, Some(dir)) => Ok(StoreConfig::new(dir.clone())),
        (None, None) => Err(CliError::config_error(
            "either --config or --data-dir is required",
        )),
    }
}

/// Create the data directory if missing
pub fn init<W: Write>(args: &StoreArgs, out: &mut W) -> CliResult<()> {
    let config = store_config(args)?;
    let store = Store::open(&config)?;

    write_response(
        out,
        json!({
            "data_dir": config.data_dir.display().to_string(),
            "tables": store.tables()?
        }),
    )
}

pub fn tables<W: Write>(args: &StoreArgs, out: &mut W) -> CliResult<()> {
    let store = Store::open(&store_config(args)?)?;
    write_response(out, json!({ "tables": store.tables()? }))
}

/// Print every matching document as one JSON line
pub fn query<W: Write>(args: &StoreArgs, options: &QueryOptions, out: &mut W) -> CliResult<()> {
    let store = Store::open(&store_config(args)?)?;

    let mut query = store
        .query_table(&options.table, &options.primary_key)?
        .offset(options.offset)
        .limit(options.limit);
    for filter in &options.filters {
        query = query.with_expression(Expression::parse(filter)?);
    }

    for document in query.documents()? {
        write_line(out, &document)?;
    }
    Ok(())
}
