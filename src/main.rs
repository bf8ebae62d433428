//! linecast server binary
//!
//! Run with: linecast [--host 127.0.0.1] [--web-port 5000] [--data-port 5001]
//!
//! Feed it lines:
//!   some_command | nc localhost 5001
//!
//! Watch them:
//!   curl -N http://localhost:5000/events

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use linecast::server::config::{DEFAULT_DATA_PORT, DEFAULT_WEB_PORT};
use linecast::{RelayServer, ServerConfig};

/// Relay newline-delimited records from one TCP producer to SSE consumers
#[derive(Parser, Debug)]
#[command(name = "linecast")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Interface both endpoints bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the HTTP consumer endpoint
    #[arg(long, default_value_t = DEFAULT_WEB_PORT)]
    web_port: u16,

    /// Port for the TCP producer endpoint
    #[arg(long, default_value_t = DEFAULT_DATA_PORT)]
    data_port: u16,

    /// Bytes read from the producer per chunk
    #[arg(long, default_value_t = 8 * 1024)]
    read_buffer_size: usize,

    /// Longest accepted record in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_record_len: usize,

    /// Seconds between SSE keep-alive comments
    #[arg(long, default_value_t = 15)]
    keep_alive_secs: u64,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .web_addr(SocketAddr::new(self.host, self.web_port))
            .data_addr(SocketAddr::new(self.host, self.data_port))
            .read_buffer_size(self.read_buffer_size)
            .max_record_len(self.max_record_len)
            .keep_alive_interval(Duration::from_secs(self.keep_alive_secs))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("linecast=info")),
        )
        .init();

    let server = RelayServer::new(cli.server_config())?.bind().await?;

    println!("Producer: nc {} {}", server.data_addr().ip(), server.data_addr().port());
    println!("Events:   http://{}/events", server.web_addr());

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
