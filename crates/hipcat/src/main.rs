//! hipcat - relay text to a HipChat room
//!
//! Sends the command-line words as one message, or each line of stdin as its
//! own message, to the configured room.

use clap::Parser;

mod cli;

use cli::Cli;

fn main() {
    hipcat_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e:#}");
        if cli::is_missing_room(&e) {
            eprintln!("{}", cli::USAGE);
        }
        std::process::exit(1);
    }
}
