//! jsondb CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, reports errors as a
//! `COMMAND_FAILED` log line on stderr and exits non-zero on failure.

use jsondb::cli;

fn main() {
    if let Err(e) = cli::run() {
        e.report();
        std::process::exit(1);
    }
}
