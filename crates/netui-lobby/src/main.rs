//! netui lobby binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve the lobby on the default port
//! netui-lobby --bind 0.0.0.0:8080
//!
//! # Connect from any terminal
//! stty raw -echo; nc localhost 8080; stty sane
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use netui_core::Color;
use netui_lobby::Lobby;
use netui_server::{ConnectionConfig, Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// netui lobby server
#[derive(Parser, Debug)]
#[command(name = "netui-lobby")]
#[command(about = "Multi-player terminal lobby served over raw TCP")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Terminal width in columns
    #[arg(long, default_value_t = 64)]
    width: u16,

    /// Terminal height in rows
    #[arg(long, default_value_t = 48)]
    height: u16,

    /// Longest wait for input before re-rendering, in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,

    /// Screen background color (black, blue, light-black, default, ...)
    #[arg(long, default_value = "black", value_parser = parse_color)]
    background: Color,

    /// Uptime refresh period, in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_color(name: &str) -> Result<Color, String> {
    Color::from_name(name).ok_or_else(|| format!("unknown color '{name}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("netui lobby starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerConfig {
        bind_address: args.bind,
        connection: ConnectionConfig {
            width: args.width,
            height: args.height,
            background: args.background,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
        },
    };

    let lobby = Arc::new(Lobby::new());
    let server = Server::bind(config, Arc::clone(&lobby)).await?;

    let ticker = {
        let (lobby, registry) = (Arc::clone(&lobby), server.registry());
        let period = Duration::from_millis(args.tick_ms.max(1));
        tokio::spawn(async move { netui_lobby::tick(&lobby, &registry, period).await })
    };

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    ticker.abort();
    Ok(())
}
