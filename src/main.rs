use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meander::app::AppContext;
use meander::cli::{commands, Cli, Commands};
use meander::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Feed { batches } => {
            commands::feed(&ctx, batches).await?;
        }
        Commands::Search { term } => {
            commands::search(&ctx, &term).await?;
        }
        Commands::Related { page_id } => {
            commands::related(&ctx, page_id).await?;
        }
    }

    Ok(())
}
