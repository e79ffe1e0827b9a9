use super::{json_list, json_single};
use crate::services::portfolio;
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize, Default)]
pub struct ProjectQuery {
    #[serde(default)]
    featured: bool,
}

/// GET /api/portfolio/projects
pub async fn projects(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(query) = query?;
    Ok(json_list(portfolio::projects(&state.portfolio, query.featured)))
}

/// GET /api/cv
pub async fn cv(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let cv = state
        .portfolio
        .cv
        .as_ref()
        .ok_or_else(|| ApiError::not_found("CV"))?;
    Ok(json_single(cv))
}
