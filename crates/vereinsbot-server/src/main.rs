mod configuration;
mod error;
mod routes;
mod state;

use crate::configuration::Settings;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};
use vereinsbot::providers::factory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr();
    let allowed_origins = settings.cors.allowed_origins.clone();

    // The server still comes up without a credential; the chat route answers
    // a configuration error per request until one is set.
    let provider = match settings.provider.into_config() {
        Some(config) => Some(Arc::from(factory::get_provider(config)?)),
        None => {
            warn!("VEREINSBOT_PROVIDER__API_KEY not set; /chat will answer 500");
            None
        }
    };

    let app = routes::configure(AppState::new(provider), &allowed_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
