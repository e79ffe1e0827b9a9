use super::json_single;
use crate::models::NewContactMessage;
use crate::services::{contact, webhook};
use crate::web::error::{ApiError, ApiResult};
use crate::web::extractors::ClientIp;
use crate::web::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// POST /api/contact
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<NewContactMessage>, JsonRejection>,
) -> ApiResult<Response> {
    if !state.config.contact.enabled {
        return Err(ApiError::not_found("Contact form"));
    }
    if let Some(wait) = state.contact_limiter.retry_after(&ip) {
        return Err(ApiError::too_many_requests(wait));
    }

    let Json(input) = payload?;
    let input = contact::validate(input, &state.config.contact)?;
    let message = contact::save_message(&state.db, &input)?;
    state.contact_limiter.record_attempt(&ip);
    tracing::info!("Contact message {} received from {}", message.id, message.email);

    if let Some(ref target) = state.webhook {
        webhook::fire(
            target,
            webhook::EVENT_CONTACT_RECEIVED,
            serde_json::json!({
                "event": webhook::EVENT_CONTACT_RECEIVED,
                "message": message,
            }),
        );
    }

    let body = json_single(serde_json::json!({
        "id": message.id,
        "created_at": message.created_at,
    }));
    Ok((StatusCode::CREATED, body).into_response())
}
