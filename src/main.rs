use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use neo_tracker::app::feed_window::FeedWindow;
use neo_tracker::config::Config;
use neo_tracker::infra::http_client::ReqwestHttp;
use neo_tracker::{logging, observability, server, NeoClient, NormalizeStrategy};

#[derive(Parser)]
#[command(name = "neo_tracker")]
#[command(about = "Near-earth-object feed proxy for the NEO dashboard")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard JSON API
    Serve {
        /// Port to listen on (overrides PORT and config.toml)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch the feed once and print normalized records
    Feed {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Skip malformed records instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Print the full upstream record for one asteroid
    Lookup {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    info!(?config, "Configuration loaded");

    let http = ReqwestHttp::new(config.neo_api.timeout()).context("building HTTP client")?;
    let neo = NeoClient::new(Arc::new(http), config.neo_api.clone());

    match cli.command {
        Commands::Serve { port } => {
            observability::init_metrics();
            let port = port.unwrap_or(config.server.port);
            if let Err(e) = server::start_server(neo, port).await {
                error!("Server exited with error: {}", e);
                anyhow::bail!("server failed: {}", e);
            }
        }
        Commands::Feed { start_date, end_date, lenient } => {
            let window = FeedWindow::parse(start_date.as_deref(), end_date.as_deref())?;
            let strategy = if lenient { NormalizeStrategy::Lenient } else { NormalizeStrategy::FailFast };
            let outcome = neo.fetch_normalized(window, strategy).await?;
            println!("{}", serde_json::to_string_pretty(&outcome.asteroids)?);
            for e in &outcome.errors {
                eprintln!("skipped: {}", e);
            }
        }
        Commands::Lookup { id } => {
            let record = neo.lookup(&id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
