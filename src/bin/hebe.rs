//! hebe command-line tool.
//!
//! Compiles a program, runs it, and exits with its result as the process
//! status.

use clap::Parser;
use hebe::driver::{self, Options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(options.log_filter())).init();

    let source = driver::read_source(&options)?;
    let result = driver::run(&source, &options)?;

    log::info!("Program returned {}", result);
    std::process::exit(result);
}
