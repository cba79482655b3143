// src/main.rs

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use ppo_relay::config::RelayConfig;
use ppo_relay::gemini::GeminiClient;
use ppo_relay::server::{self, AppState};

/// PPO-AI relay - persona chat over the Gemini API
#[derive(Parser, Debug)]
#[command(name = "ppo-relay", version, about)]
struct Args {
    /// Listen host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Gemini API key (overrides GEMINI_API_KEY)
    #[arg(long)]
    gemini_api_key: Option<String>,

    /// Gemini model name (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Gemini API base URL (overrides GEMINI_BASE_URL)
    #[arg(long)]
    gemini_base_url: Option<String>,
}

impl Args {
    /// CLI args > env vars > defaults
    fn apply(self, config: &mut RelayConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(key) = self.gemini_api_key.filter(|k| !k.trim().is_empty()) {
            config.gemini_api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.gemini.model = model;
        }
        if let Some(base_url) = self.gemini_base_url {
            config.gemini.base_url = base_url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory is optional
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = RelayConfig::from_env();
    args.apply(&mut config);
    config.log_summary();

    let addr = config.bind_addr()?;
    let upstream = Arc::new(GeminiClient::new(config.gemini.clone())?);
    let state = AppState::new(&config, upstream);

    server::run(addr, state).await
}
