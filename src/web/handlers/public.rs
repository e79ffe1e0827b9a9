use super::{json_list, json_page, json_single};
use crate::models::PostScope;
use crate::services::listing::{self, ListQuery};
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use std::sync::Arc;

/// GET /api/blog/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(query) = query?;
    let posts = state.posts(PostScope::Published).await?;
    let content = &state.config.content;
    let page = listing::list(posts, &query, content.posts_per_page, content.max_per_page);
    Ok(json_page(page))
}

/// GET /api/blog/post/:slug
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let post = state
        .post_by_slug(&slug)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found("Post"))?;

    let published = state.posts(PostScope::Published).await?;
    let related = listing::related_posts(&published, &post);

    Ok(json_single(serde_json::json!({
        "post": post,
        "related": related,
    })))
}

/// GET /api/blog/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let categories = state.categories().await?;
    Ok(json_list(categories))
}

/// GET /api/blog/tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let tags = state.tags().await?;
    Ok(json_list(tags))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
