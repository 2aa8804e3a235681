//! Minimal HTTP/1.1 server (v1)
//!
//! Answers one request per connection from a fixed route table.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──TCP──▶ net::listener ──▶ http::server ──▶ http::request (parse)
//!                                            │
//!                                            ▼
//!                                      routing::router ──▶ routing::handlers
//!                                            │                    │
//!                                            │                    ▼
//!                                            │              storage (files)
//!                                            ▼
//!     Client ◀──TCP── http::response (serialize, gzip) ◀─────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use http_file_server::config::{self, ConfigError, ConfigOverrides, ServerConfig};
use http_file_server::lifecycle::{signals, Shutdown};
use http_file_server::net::listener::Listener;
use http_file_server::observability::logging;
use http_file_server::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "http-file-server")]
#[command(about = "Minimal HTTP/1.1 server with echo, user-agent and file routes", long_about = None)]
struct Cli {
    /// Directory to serve /files/ from.
    #[arg(short, long)]
    directory: Option<String>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (e.g. 0.0.0.0:4221).
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Load the config file (if any), apply command-line overrides and
    /// validate the merged result.
    fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let overrides = ConfigOverrides {
            directory: self.directory.clone(),
            bind_address: self.bind.clone(),
            log_level: self.log_level.clone(),
        };
        config::resolve_config(self.config.as_deref(), &overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability.log_level)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        directory = %config.files.directory,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_signal().await?;
    shutdown.trigger();
    server_task.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
