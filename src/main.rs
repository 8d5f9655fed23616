mod aggregate;
mod cli;
mod config;
mod data;
mod error;
mod excise;
mod lexicon;
mod pipeline;
mod report;
mod scoring;
mod stats;

use std::process;

use clap::Parser;

use cli::Cli;
use error::{AnalysisError, ErrorKind};

fn main() {
    let cli = Cli::parse();

    // Log to stderr so the report on stdout stays clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
        let configuration = e
            .downcast_ref::<AnalysisError>()
            .map_or(true, |a| a.kind() == ErrorKind::Configuration);
        if configuration {
            eprintln!("Processing did not proceed; no further output was written.");
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    let outcome = pipeline::run(&config)?;
    println!("{}", report::render(&outcome, config.report_format)?);
    Ok(())
}
