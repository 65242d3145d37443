use anyhow::Result;
use axum::Router;
use clap::Parser;
use core_lib::{Bm25Params, RankWeights, DEFAULT_TOP_K};
use server::{build_app, ScoringConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// BM25 term-saturation parameter
    #[arg(long, default_value_t = 1.5)]
    k1: f32,
    /// BM25 length-normalization parameter
    #[arg(long, default_value_t = 0.75)]
    b: f32,
    /// Hybrid weight on the BM25 sum
    #[arg(long, default_value_t = 0.55)]
    alpha: f32,
    /// Hybrid weight on the normalized rating
    #[arg(long, default_value_t = 0.35)]
    beta: f32,
    /// Hybrid weight on the normalized vote count
    #[arg(long, default_value_t = 0.10)]
    gamma: f32,
    /// Default number of recommendations returned
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let scoring = ScoringConfig {
        bm25: Bm25Params {
            k1: args.k1,
            b: args.b,
        },
        weights: RankWeights {
            alpha: args.alpha,
            beta: args.beta,
            gamma: args.gamma,
        },
        top_k: args.top_k,
    };
    let app: Router = build_app(args.index.clone(), scoring)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
