//! REST handlers.

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use carepoint_core::{
    Appointment, ChatMessage, ChatSession, ClinicalRecord, CoreError, PrescriptionGenerator,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

type ApiError = (StatusCode, String);

/// Map a core error onto an HTTP status, logging anything that is not the caller's fault.
fn api_error(e: CoreError) -> ApiError {
    let status = match &e {
        CoreError::InvalidInput(_) | CoreError::Text(_) | CoreError::SchemaMismatch { .. } => {
            StatusCode::BAD_REQUEST
        }
        CoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => {
            tracing::error!("request failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

fn parse_record(body: &str) -> Result<ClinicalRecord, ApiError> {
    ClinicalRecord::from_json_str(body).map_err(api_error)
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct GenerateRes {
    /// Always `generated` on success.
    pub state: String,
    pub confirmation: String,
    pub title: String,
    pub html: String,
}

#[derive(Serialize, ToSchema)]
pub struct AppointmentsRes {
    #[schema(value_type = Vec<Object>)]
    pub upcoming: Vec<Appointment>,
    #[schema(value_type = Vec<Object>)]
    pub past: Vec<Appointment>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentsQuery {
    /// Reference day (YYYY-MM-DD). Defaults to today in UTC.
    pub today: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatMessageRes {
    pub id: u32,
    /// `bot` or `user`.
    pub sender: String,
    pub content: String,
    pub timestamp: String,
}

impl From<&ChatMessage> for ChatMessageRes {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            sender: message.sender.as_str().to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub messages: Vec<ChatMessageRes>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Carepoint REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/prescriptions/document",
    request_body(content = String, content_type = "application/json", description = "Clinical record"),
    responses(
        (status = 200, description = "Printable HTML document", content_type = "text/html", body = String),
        (status = 400, description = "Record does not match the schema")
    )
)]
/// Render a clinical record as a printable HTML document
///
/// The body is parsed directly so that schema errors name the failing field
/// (e.g. `medications[0].dosage`).
#[axum::debug_handler]
pub async fn render_document(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let record = parse_record(&body)?;
    let document = state.renderer.generate(&record);
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        document.into_html(),
    ))
}

#[utoipa::path(
    post,
    path = "/prescriptions/summary",
    request_body(content = String, content_type = "application/json", description = "Clinical record"),
    responses(
        (status = 200, description = "Plain-text summary", content_type = "text/plain", body = String),
        (status = 400, description = "Record does not match the schema")
    )
)]
/// Render the plain-text clipboard summary of a clinical record
#[axum::debug_handler]
pub async fn render_summary(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let record = parse_record(&body)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.renderer.summarize(&record),
    ))
}

#[utoipa::path(
    post,
    path = "/prescriptions/generate",
    request_body(content = String, content_type = "application/json", description = "Clinical record"),
    responses(
        (status = 200, description = "Prescription generated", body = GenerateRes),
        (status = 400, description = "Record does not match the schema")
    )
)]
/// Run the full generate flow for a record
///
/// Waits the configured generation delay before answering, mirroring what the portal shows.
#[axum::debug_handler]
pub async fn generate_prescription(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<GenerateRes>, ApiError> {
    let record = parse_record(&body)?;
    let mut generator = PrescriptionGenerator::new(record, state.renderer.as_ref().clone());

    let (title, html) = {
        let document = generator
            .run(state.cfg.generation_delay(), |_| {})
            .await
            .map_err(api_error)?;
        (document.title().to_string(), document.html().to_string())
    };

    Ok(Json(GenerateRes {
        state: generator.state().to_string(),
        confirmation: generator.confirmation().unwrap_or_default(),
        title,
        html,
    }))
}

#[utoipa::path(
    get,
    path = "/appointments",
    params(AppointmentsQuery),
    responses(
        (status = 200, description = "Upcoming and past appointments", body = AppointmentsRes),
        (status = 400, description = "Invalid reference date")
    )
)]
/// List appointments split into upcoming and past
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentsRes>, ApiError> {
    let today = match query.today.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("invalid input: today must be YYYY-MM-DD, got {raw:?}"),
            )
        })?,
        None => Utc::now().date_naive(),
    };

    Ok(Json(AppointmentsRes {
        upcoming: state
            .appointments
            .upcoming(today)
            .into_iter()
            .cloned()
            .collect(),
        past: state.appointments.past(today).into_iter().cloned().collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Transcript including the canned reply", body = ChatRes),
        (status = 400, description = "Blank message")
    )
)]
/// Send a message to the chat assistant
///
/// Each request starts a fresh session: greeting, the user's message, then the canned reply
/// after the configured delay.
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatReq>,
) -> Result<Json<ChatRes>, ApiError> {
    let mut session = ChatSession::new();
    session.open();

    if session
        .send_and_reply(&req.message, state.cfg.chat_reply_delay())
        .await
        .is_none()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            "invalid input: message cannot be blank".into(),
        ));
    }

    Ok(Json(ChatRes {
        messages: session.messages().iter().map(ChatMessageRes::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use carepoint_core::{AppointmentBook, CoreConfig, Letterhead};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    const RECORD_JSON: &str = r#"{
        "recordId": "RX-2024-001",
        "issuedDate": "2024-12-15",
        "patient": {"name": "Priya Sharma", "id": "PT-1042", "age": 34, "gender": "Female", "phone": "+91 98765 43210"},
        "prescriber": {"name": "Dr. Sarah Johnson", "license": "MCI-55821", "specialty": "General Medicine"},
        "diagnosis": "Acute bacterial sinusitis",
        "medications": [{"name": "Amoxicillin", "dosage": "500mg", "frequency": "3x/day", "timing": "after meals", "duration": "7 days", "instructions": "complete full course"}],
        "generalInstructions": "Rest and drink plenty of fluids.",
        "followUpDate": "2025-01-10"
    }"#;

    fn app() -> axum::Router {
        let cfg = CoreConfig::new(Letterhead::default(), Duration::ZERO, Duration::ZERO, None);
        router(AppState::new(cfg, AppointmentBook::demo()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn document_endpoint_returns_html() {
        let response = app()
            .oneshot(post_json("/prescriptions/document", RECORD_JSON))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let html = body_string(response).await;
        assert!(html.contains("<h4>1. Amoxicillin 500mg</h4>"));
        assert!(html.contains("Next appointment scheduled for: 2025-01-10"));
    }

    #[tokio::test]
    async fn summary_endpoint_returns_text() {
        let response = app()
            .oneshot(post_json("/prescriptions/summary", RECORD_JSON))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_string(response).await;
        assert!(text.starts_with("Prescription for Priya Sharma\n"));
        assert!(text.contains("Follow-up: 2025-01-10"));
    }

    #[tokio::test]
    async fn malformed_record_is_bad_request_with_path() {
        let broken = RECORD_JSON.replace("\"age\": 34", "\"age\": \"34\"");
        let response = app()
            .oneshot(post_json("/prescriptions/document", &broken))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("patient.age"));
    }

    #[tokio::test]
    async fn generate_endpoint_completes_flow() {
        let response = app()
            .oneshot(post_json("/prescriptions/generate", RECORD_JSON))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["state"], "generated");
        assert_eq!(json["title"], "Prescription - Priya Sharma");
        assert!(json["confirmation"]
            .as_str()
            .unwrap()
            .contains("RX-2024-001"));
    }

    #[tokio::test]
    async fn appointments_split_on_reference_day() {
        let response = app()
            .oneshot(
                Request::get("/appointments?today=2024-12-10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let upcoming: Vec<u64> = json["upcoming"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_u64().unwrap())
            .collect();
        assert_eq!(upcoming, vec![1, 2, 3]);
        assert_eq!(json["past"].as_array().unwrap().len(), 2);
        assert_eq!(json["upcoming"][0]["type"], "Follow-up");
    }

    #[tokio::test]
    async fn appointments_reject_bad_date() {
        let response = app()
            .oneshot(
                Request::get("/appointments?today=10-12-2024")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_returns_transcript_with_reply() {
        let response = app()
            .oneshot(post_json("/chat", r#"{"message": "Do you open on Sundays?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["sender"], "user");
        assert_eq!(messages[1]["content"], "Do you open on Sundays?");
        assert_eq!(messages[2]["sender"], "bot");
    }

    #[tokio::test]
    async fn chat_accepts_long_message() {
        let body = serde_json::json!({ "message": "a".repeat(4_001) }).to_string();
        let response = app().oneshot(post_json("/chat", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["messages"][1]["content"].as_str().unwrap().len(), 4_001);
        assert_eq!(json["messages"][2]["sender"], "bot");
    }

    #[tokio::test]
    async fn chat_rejects_blank_message() {
        let response = app()
            .oneshot(post_json("/chat", r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
