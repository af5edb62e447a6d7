use clap::Parser;
use electron_docs_sync::cli::{run, Cli};
use electron_docs_sync::load_config::TOKEN_VARS;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Developer machines keep their token in .env; CI exports it directly.
    if TOKEN_VARS.iter().all(|var| std::env::var_os(var).is_none()) {
        dotenvy::dotenv().ok();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => {
            tracing::info!("CLI completed successfully");
            std::process::exit(0);
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "CLI exited with error");
            std::process::exit(1);
        }
    }
}
