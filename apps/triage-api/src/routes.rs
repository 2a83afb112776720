use std::sync::OnceLock;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use triage_service::{
    CreateTicketRequest, EnhancedTicket, ListTicketsRequest, ListTicketsResponse, ServiceError,
    TicketView, WorkflowStats,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tickets", get(list_tickets).post(submit_ticket))
        .route("/api/tickets/stats", get(workflow_stats))
        .route("/api/tickets/{id}", get(get_ticket))
        .route("/api/tickets/{id}/enhanced", get(get_enhanced_ticket))
        .route("/api/tickets/{id}/classify", post(classify_ticket))
        .route("/api/tickets/{id}/draft", post(generate_draft).put(update_draft))
        .route("/api/tickets/{id}/approve", put(approve_ticket))
        .route("/api/tickets/{id}/escalate", put(escalate_ticket))
        .with_state(state)
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("The email pattern is a valid regex.")
    })
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn submit_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketView>), ApiError> {
    if !email_regex().is_match(payload.email.trim()) {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_argument",
            "Invalid email format.",
        ));
    }

    let ticket = state.service.create_ticket(payload).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListTicketsRequest>,
) -> Result<Json<ListTicketsResponse>, ApiError> {
    let response = state.service.list_tickets(query).await?;
    Ok(Json(response))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TicketView>, ApiError> {
    let ticket = state.service.get_ticket(id).await?;
    Ok(Json(ticket))
}

async fn get_enhanced_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EnhancedTicket>, ApiError> {
    let view = state.service.enhanced_ticket(id).await?;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    category: String,
}

async fn classify_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let category = state.service.classify_ticket(id).await?;
    Ok(Json(ClassifyResponse { category }))
}

#[derive(Debug, Serialize)]
struct DraftResponse {
    draft: String,
}

async fn generate_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DraftResponse>, ApiError> {
    let draft = state.service.generate_draft(id).await?;
    Ok(Json(DraftResponse { draft }))
}

#[derive(Debug, Deserialize)]
struct UpdateDraftRequest {
    draft: String,
}

async fn update_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDraftRequest>,
) -> Result<StatusCode, ApiError> {
    state.service.update_draft(id, &payload.draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.approve_ticket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct EscalateRequest {
    reason: Option<String>,
}

async fn escalate_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Option<Json<EscalateRequest>>,
) -> Result<StatusCode, ApiError> {
    let reason = payload.as_ref().and_then(|Json(body)| body.reason.as_deref());

    state.service.escalate_ticket(id, reason).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn workflow_stats(
    State(state): State<AppState>,
) -> Result<Json<WorkflowStats>, ApiError> {
    let stats = state.service.workflow_stats().await?;
    Ok(Json(stats))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_code: String,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_code: String,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { message } => {
                json_error(StatusCode::NOT_FOUND, "not_found", message)
            }
            ServiceError::InvalidArgument { message } => {
                json_error(StatusCode::BAD_REQUEST, "invalid_argument", message)
            }
            ServiceError::InvalidOperation { message } => {
                json_error(StatusCode::BAD_REQUEST, "invalid_operation", message)
            }
            ServiceError::ProviderTimeout { message } => {
                json_error(StatusCode::GATEWAY_TIMEOUT, "provider_timeout", message)
            }
            ServiceError::Provider { message } => {
                json_error(StatusCode::BAD_GATEWAY, "provider_error", message)
            }
            ServiceError::Storage { message } => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_code: self.error_code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
