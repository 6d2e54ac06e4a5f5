//! docsweep CLI — bulk AWS documentation crawler.
//!
//! Walks the documentation site's sitemaps, fetches every page in two
//! locales, and dumps the filtered result to object storage for the
//! downstream translation stage.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
