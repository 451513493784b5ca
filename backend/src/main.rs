//! Backend entry-point: loads settings, provisions the optional administrator
//! and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use persona::inbound::http::health::HealthState;
use server::{ServerConfig, ServerSettings, build_token_issuer, create_server, provision_admin};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load server settings: {e}")))?;

    let config = ServerConfig::new(build_token_issuer(), settings.bind_addr());

    if let Some((user_name, password)) = settings.admin_credentials() {
        provision_admin(&config, user_name, password).await;
    }

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
