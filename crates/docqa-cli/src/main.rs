//! docqa - talk to your documents from the terminal

use anyhow::Result;
use clap::Parser as _;
use docqa_cli::{Cli, handlers};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    handlers::handle_interactive(cli).await?;

    Ok(())
}
