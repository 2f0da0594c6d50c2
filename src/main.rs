use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use carepoint_core::constants::{DEFAULT_REST_ADDR, ENV_REST_ADDR};
use carepoint_core::CoreConfig;

/// Main entry point for the Carepoint application
///
/// Resolves configuration once from the environment (and `.env`, if present), then serves the
/// REST API with Swagger UI at `/swagger-ui`.
///
/// # Environment Variables
/// - `CAREPOINT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CAREPOINT_CLINIC_NAME`, `CAREPOINT_CLINIC_ADDRESS`, `CAREPOINT_CLINIC_PHONE`,
///   `CAREPOINT_CLINIC_EMAIL`: letterhead overrides
/// - `CAREPOINT_GENERATION_DELAY_MS`: simulated generation wait (default: 2000)
/// - `CAREPOINT_CHAT_REPLY_DELAY_MS`: simulated chat reply wait (default: 1000)
/// - `CAREPOINT_APPOINTMENTS_FILE`: appointments fixture (default: bundled demo data)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values are invalid or the appointments file cannot be loaded,
/// - the server address cannot be parsed or bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carepoint_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var(ENV_REST_ADDR)
        .unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
        .parse()?;

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    let state = AppState::from_config(cfg)?;

    tracing::info!("++ Starting Carepoint REST on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
