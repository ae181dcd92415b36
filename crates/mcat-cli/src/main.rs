//! mcat - the `mcat` binary entry point.

use anyhow::Result;
use clap::Parser;

use mcat_cli::{commands, init_logging, Cli, CliConfig, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format(), cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let config = CliConfig::load_or_default(cli.config.as_deref()).await?;
        match cli.command {
            Commands::Sync(args) => commands::sync::execute(args, config).await,
            Commands::Render(args) => commands::render::execute(args, config).await,
            Commands::Inspect(args) => commands::inspect::execute(args, config).await,
        }
    })
}
