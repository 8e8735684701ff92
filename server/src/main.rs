use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve per-year n-gram counts over HTTP")]
struct Args {
    /// Persisted index file written by `indexer build`
    #[arg(long, default_value = "./index/inverted_index.txt")]
    index: String,
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Comma-separated CORS origins; any origin when unset
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app = server::build_app(&args.index, args.cors_allow_origin.as_deref())?;

    let listener = TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %args.listen, index = %args.index, "serving n-gram counts");
    axum::serve(listener, app).await?;
    Ok(())
}
