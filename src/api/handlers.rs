//! HTTP request handlers

use super::assets::serve_static;
use super::types::{AjaxRequest, ErrorResponse, HookResponse};
use super::widget::{render_host_page, render_widget};
use super::{AppState, AJAX_ACTION, AJAX_PATH, WIDGET_CONFIG_PATH};
use crate::content_sync::{ContentSavedEvent, SyncDisposition};
use crate::nonce::{constant_time_eq, QUERY_ACTION};
use crate::rag::QueryRequest;
use crate::session::{ProxyEnvelope, WidgetConfig};
use crate::text::sanitize_text_field;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    extract::Form,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Host page with the widget embedded
        .route("/", get(serve_host_page))
        // Widget renderer
        .route("/widget", get(serve_widget))
        .route(WIDGET_CONFIG_PATH, get(widget_config))
        // Widget stylesheet and script
        .route("/assets/*path", get(serve_static))
        // Chat proxy
        .route(AJAX_PATH, post(admin_ajax))
        // Content sync hook
        .route("/hooks/content-saved", post(content_saved))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Widget Renderer
// ============================================================

fn issue_widget_config(state: &AppState) -> WidgetConfig {
    WidgetConfig {
        ajax_url: state.ajax_url.to_string(),
        nonce: state.nonces.issue(QUERY_ACTION),
    }
}

async fn serve_host_page(State(state): State<AppState>) -> Html<String> {
    Html(render_host_page(&issue_widget_config(&state)))
}

async fn serve_widget(State(state): State<AppState>) -> Html<String> {
    Html(render_widget(&issue_widget_config(&state)))
}

async fn widget_config(State(state): State<AppState>) -> Json<WidgetConfig> {
    Json(issue_widget_config(&state))
}

// ============================================================
// Chat Proxy
// ============================================================

async fn admin_ajax(
    State(state): State<AppState>,
    Form(req): Form<AjaxRequest>,
) -> Result<Json<ProxyEnvelope>, AppError> {
    if req.action != AJAX_ACTION {
        return Err(AppError::UnknownAction(req.action));
    }
    if state.nonces.verify(&req.nonce, QUERY_ACTION).is_none() {
        return Err(AppError::InvalidNonce);
    }

    let request = QueryRequest {
        text: sanitize_text_field(&req.query),
        context: req
            .context
            .iter()
            .map(String::as_str)
            .map(sanitize_text_field)
            .collect(),
    };

    // Failure details are logged by the backend and never sent to the browser
    let data = state
        .backend
        .query(&request)
        .await
        .map_err(|_| AppError::Upstream)?;

    Ok(Json(ProxyEnvelope::success(data)))
}

// ============================================================
// Content Sync Hook
// ============================================================

async fn content_saved(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(event): Json<ContentSavedEvent>,
) -> Result<(StatusCode, Json<HookResponse>), AppError> {
    if let Some(expected) = &state.hook_token {
        let presented = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
        let authorized = presented
            .is_some_and(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()));
        if !authorized {
            return Err(AppError::Unauthorized);
        }
    }

    let (disposition, _) = state.content_sync.on_content_saved(&event);
    let status = match disposition {
        SyncDisposition::Skipped => StatusCode::OK,
        SyncDisposition::Dispatched => StatusCode::ACCEPTED,
    };

    Ok((status, Json(HookResponse { status: disposition })))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("rag-chatbot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    UnknownAction(String),
    InvalidNonce,
    Upstream,
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Same bodies the host CMS sends for these cases
            AppError::UnknownAction(action) => {
                tracing::debug!(action = %action, "Unknown ajax action");
                (StatusCode::BAD_REQUEST, Json(ProxyEnvelope::error("0"))).into_response()
            }
            AppError::InvalidNonce => {
                tracing::warn!("Rejected chat query with invalid nonce");
                (StatusCode::FORBIDDEN, Json(ProxyEnvelope::error("-1"))).into_response()
            }
            AppError::Upstream => {
                (StatusCode::OK, Json(ProxyEnvelope::error("Error processing query"))).into_response()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Missing or invalid hook token")),
            )
                .into_response(),
        }
    }
}
