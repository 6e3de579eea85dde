use anyhow::Result;
use clap::Parser;

use dataguru::{cli::Cli, runtime::Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // A failed load surfaces here and exits non-zero
    let orchestrator = Orchestrator::new(cli)?;
    orchestrator.run().await
}
