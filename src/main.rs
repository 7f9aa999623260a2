use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pickazoo::app::{AppContext, AppError};
use pickazoo::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "warn,pickazoo=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let ctx = AppContext::new(cli.data_dir)?;

    match cli.command {
        Commands::Add {
            url,
            name,
            pick,
            no_validate,
        } => {
            commands::add_feed(&ctx, &url, &name, pick, !no_validate).await?;
        }
        Commands::List => {
            commands::list_feeds(&ctx)?;
        }
        Commands::Discover { url, json } => {
            commands::discover(&ctx, &url, json).await?;
        }
        Commands::Check { url } => {
            commands::check_url(&ctx, &url).await?;
        }
        Commands::Resize {
            name,
            width,
            height,
        } => {
            commands::resize_feed(&ctx, &name, width, height)?;
        }
        Commands::Open { name } => {
            commands::open_feed(&ctx, &name)?;
        }
    }

    Ok(())
}
