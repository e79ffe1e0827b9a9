use super::{json_list, json_page, json_single};
use crate::models::{CreateCategory, CreatePost, PostScope, UpdateCategory, UpdatePost};
use crate::services::contact;
use crate::services::listing::{self, ListQuery};
use crate::web::error::{ApiError, ApiResult};
use crate::web::extractors::{CurrentUser, Editor};
use crate::web::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

const RECENT_MESSAGES: usize = 100;

/// GET /api/admin/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(query) = query?;
    let posts = state.posts(PostScope::All).await?;
    let content = &state.config.content;
    let page = listing::list(posts, &query, content.posts_per_page, content.max_per_page);
    Ok(json_page(page))
}

/// GET /api/admin/posts/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let post = state
        .post_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;
    Ok(json_single(post))
}

/// POST /api/blog/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(input) = payload?;
    let post = state.store.create_post(input)?;
    state.invalidate_content();
    tracing::info!("{} created post '{}'", user.username, post.slug);
    Ok((StatusCode::CREATED, json_single(post)).into_response())
}

/// PUT /api/blog/posts/:id
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePost>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(input) = payload?;
    let post = state.store.update_post(&id, input)?;
    state.invalidate_content();
    tracing::info!("{} updated post '{}'", user.username, post.slug);
    Ok(json_single(post))
}

/// DELETE /api/blog/posts/:id
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_post(&id)? {
        return Err(ApiError::not_found("Post"));
    }
    state.invalidate_content();
    tracing::info!("{} deleted post {}", user.username, id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/blog/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(input) = payload?;
    let category = state.store.create_category(input)?;
    state.invalidate_content();
    tracing::info!("{} created category '{}'", user.username, category.name);
    Ok((StatusCode::CREATED, json_single(category)).into_response())
}

/// PUT /api/blog/categories/:id
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategory>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(input) = payload?;
    let category = state.store.update_category(&id, input)?;
    state.invalidate_content();
    tracing::info!("{} updated category '{}'", user.username, category.name);
    Ok(json_single(category))
}

/// DELETE /api/blog/categories/:id
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_category(&id)? {
        return Err(ApiError::not_found("Category"));
    }
    state.invalidate_content();
    tracing::info!("{} deleted category {}", user.username, id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let messages = contact::list_messages(&state.db, RECENT_MESSAGES)?;
    Ok(json_list(messages))
}
