//! Bingo ticket tracker CLI
//!
//! Command-line host for the ticket store. Tickets and the draw are saved
//! under a data directory and reloaded on every run.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- import tickets.csv
//! cargo run -- add --lot 1 --position 3 5 12 27 34 45 67 89
//! cargo run -- draw 5 12 27
//! cargo run -- results
//! cargo run -- --data-dir /tmp/game export -o tickets.csv
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (default `warn`); logs go to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid input, unreadable file, unknown ticket, etc.)

use bingo_ticket_engine::cli;
use bingo_ticket_engine::core::{StoreConfig, TicketStore};
use bingo_ticket_engine::io::{BackgroundStorage, FileStorage};
use std::process;
use tokio::runtime::Runtime;

fn main() {
    cli::init_logging();
    let args = cli::parse_args();

    // The store runs on this thread; the runtime only drives the storage writer
    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    let storage = BackgroundStorage::spawn(FileStorage::new(&args.data_dir), runtime.handle());
    let mut store = TicketStore::open(storage, StoreConfig::default());

    let mut output = std::io::stdout();
    let result = cli::execute(args.command, &mut store, &mut output);

    // waits for queued writes before the runtime shuts down
    store.close();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
