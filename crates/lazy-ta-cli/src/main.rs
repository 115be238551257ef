//! lazy-ta command-line interface
//!
//! Reads bars from CSV, runs one registered indicator and writes its plots
//! as CSV. Set `RUST_LOG=debug` to see what is evaluated.

use std::io;
use std::process::ExitCode;

use lazy_ta::prelude::Registry;
use lazy_ta_cli::{execute, Args};

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse_args();
    let registry = Registry::with_builtin();
    let mut stdout = io::stdout().lock();
    match execute(&args.command, &registry, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
