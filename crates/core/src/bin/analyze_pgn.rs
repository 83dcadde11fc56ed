//! Analyze a PGN file for one player and print the review as JSON

use chess_review_core::{Analyzer, Config, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn run(path: &str, username: &str) -> Result<()> {
    let pgn = std::fs::read_to_string(path)?;

    let analyzer = Analyzer::from_config(&Config::from_env())?;
    if analyzer.has_backend() {
        info!("AI backend configured, local analysis is the fallback");
    } else {
        info!("AI_API_KEY not set, running local analysis only");
    }

    let bundle = analyzer.analyze(&pgn, username).await;
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(username)) = (args.next(), args.next()) else {
        eprintln!("Usage: analyze-pgn <pgn_file> <username>");
        std::process::exit(1);
    };

    if let Err(e) = run(&path, &username).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
