//! `taskboard-mock`: in-memory stand-in for the Taskboard task API.
//!
//! ```bash
//! # Run on the default address 127.0.0.1:8080 with token "dev"
//! cargo run --bin taskboard-mock
//!
//! # Custom address and token
//! cargo run --bin taskboard-mock -- --bind 0.0.0.0:9000 --auth-token s3cret
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_mock::config::{MockCliArgs, MockConfig};
use taskboard_mock::server::{self, MockState};

#[tokio::main]
async fn main() {
    let cli = MockCliArgs::parse();

    let config = match MockConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskboard mock server");

    let state = Arc::new(MockState::new(config.auth_token));
    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "mock server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "mock server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start mock server");
            std::process::exit(1);
        }
    }
}
