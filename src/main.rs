use anyhow::{Context, Result};
use clap::Parser;

use atlas_dl::cli::Args;
use atlas_dl::config::Config;
use atlas_dl::{commands, logging};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let config = Config::from_args(&args).context("Failed to load configuration")?;

    if args.list_products {
        commands::list_products(&config);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { commands::run(&config).await })?;
    Ok(())
}
