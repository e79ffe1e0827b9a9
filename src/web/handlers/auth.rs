use super::json_single;
use crate::models::UserRole;
use crate::services::{auth, ContentError};
use crate::web::error::{ApiError, ApiResult};
use crate::web::extractors::{session_token, ClientIp, CurrentUser, SESSION_COOKIE};
use crate::web::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration;

fn session_cookie(token: String, days: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(days))
        .build()
}

fn session_body(user: &crate::models::User, token: &str) -> Json<serde_json::Value> {
    json_single(serde_json::json!({
        "user": user,
        "token": token,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    if let Some(wait) = state.login_limiter.retry_after(&ip) {
        tracing::warn!("Login locked out for {}", ip);
        return Err(ApiError::too_many_requests(wait));
    }

    let Json(form) = payload?;
    match auth::authenticate(&state.db, &form.username, &form.password)? {
        Some(user) => {
            state.login_limiter.clear(&ip);
            let days = state.config.auth.session_days();
            let token = auth::create_session(&state.db, user.id, days)?;
            tracing::info!("{} signed in", user.username);
            let body = session_body(&user, &token);
            Ok((jar.add(session_cookie(token, days)), body).into_response())
        }
        None => {
            state.login_limiter.record_attempt(&ip);
            tracing::warn!("Failed login for '{}' from {}", form.username, ip);
            Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            ))
        }
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        auth::delete_session(&state.db, &token)?;
    }

    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    Ok((jar.remove(cookie), StatusCode::NO_CONTENT).into_response())
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    json_single(user)
}

#[derive(Deserialize)]
pub struct SetupRequest {
    username: String,
    email: String,
    password: String,
    password_confirm: String,
}

/// POST /api/auth/setup. Creates the first admin; refused once any user exists.
pub async fn setup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> ApiResult<Response> {
    if auth::has_users(&state.db)? {
        return Err(ApiError::forbidden("Setup has already been completed"));
    }

    let Json(form) = payload?;
    if form.password != form.password_confirm {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    let user_id = auth::create_user(
        &state.db,
        &form.username,
        &form.email,
        &form.password,
        UserRole::Admin,
    )
    .map_err(|e| ContentError::validation(e.to_string()))?;

    let user = auth::get_user_by_username(&state.db, &form.username)?
        .ok_or_else(|| ApiError::not_found("User"))?;
    let days = state.config.auth.session_days();
    let token = auth::create_session(&state.db, user_id, days)?;
    tracing::info!("Created admin user {}", user.username);

    let body = session_body(&user, &token);
    Ok((StatusCode::CREATED, jar.add(session_cookie(token, days)), body).into_response())
}
