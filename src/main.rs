#![recursion_limit = "256"]

use anyhow::Result;
use clap::Parser;
use pyramid_gan::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pyramid_gan=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
