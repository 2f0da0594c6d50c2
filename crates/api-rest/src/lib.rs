//! # API REST
//!
//! REST API implementation for Carepoint.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, content types, CORS)
//!
//! All document and chat behaviour lives in `carepoint-core`; handlers only translate.

#![warn(rust_2018_idioms)]

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use carepoint_core::{AppointmentBook, CoreConfig, CoreResult, DocumentRenderer};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use handlers::{
    AppointmentsRes, ChatMessageRes, ChatReq, ChatRes, GenerateRes, HealthRes,
};

/// Application state shared across REST API handlers.
///
/// Everything here is resolved at startup; handlers never read the environment.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    renderer: Arc<DocumentRenderer>,
    appointments: Arc<AppointmentBook>,
}

impl AppState {
    /// Build state from configuration, loading the appointments fixture if one is configured
    /// and falling back to the bundled demo fixture otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured appointments file cannot be read or parsed.
    pub fn from_config(cfg: CoreConfig) -> CoreResult<Self> {
        let appointments = match cfg.appointments_file() {
            Some(path) => AppointmentBook::load(path)?,
            None => {
                tracing::info!("no appointments file configured, serving demo fixture");
                AppointmentBook::demo()
            }
        };
        Ok(Self::new(cfg, appointments))
    }

    pub fn new(cfg: CoreConfig, appointments: AppointmentBook) -> Self {
        let renderer = DocumentRenderer::new(cfg.letterhead().clone());
        Self {
            cfg: Arc::new(cfg),
            renderer: Arc::new(renderer),
            appointments: Arc::new(appointments),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::render_document,
        handlers::render_summary,
        handlers::generate_prescription,
        handlers::list_appointments,
        handlers::chat,
    ),
    components(schemas(
        HealthRes,
        GenerateRes,
        AppointmentsRes,
        ChatReq,
        ChatRes,
        ChatMessageRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI mounted at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/prescriptions/document", post(handlers::render_document))
        .route("/prescriptions/summary", post(handlers::render_summary))
        .route("/prescriptions/generate", post(handlers::generate_prescription))
        .route("/appointments", get(handlers::list_appointments))
        .route("/chat", post(handlers::chat))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
