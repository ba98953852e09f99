use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::app::{self, Session};
use tax_cli::cli::Cli;
use tax_cli::config::Config;
use tax_cli::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .apply(cli.overrides());

    logging::init_logging(&config.log_level);
    debug!(?config, "configuration loaded");

    let session = Session::from_config(&config)?;
    let output = app::execute(&session, &cli.command, cli.json)?;
    print!("{output}");
    if cli.json {
        println!();
    }

    Ok(())
}
