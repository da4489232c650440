mod cli;
mod config;
mod error;
mod output;
mod report;
mod workflows;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::{info, LevelFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if !cli.is_quiet() {
        output::print_banner();
    }

    info!("Starting ghjobs - GitHub Actions job discovery");
    cli.execute()?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("ghjobs", LevelFilter::Debug);
    }
    builder.init();
}
