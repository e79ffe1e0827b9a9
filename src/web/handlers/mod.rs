pub mod admin;
pub mod auth;
pub mod contact;
pub mod portfolio;
pub mod public;

use crate::services::listing::Page;
use axum::response::Json;
use serde::Serialize;

pub(crate) fn json_single<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": data,
    }))
}

pub(crate) fn json_page<T: Serialize>(page: Page<T>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": page.items,
        "meta": {
            "total": page.total,
            "page": page.page,
            "per_page": page.per_page,
            "total_pages": page.total_pages,
        }
    }))
}

/// Unpaginated list, reported as a single page.
pub(crate) fn json_list<T: Serialize>(items: Vec<T>) -> Json<serde_json::Value> {
    let total = items.len();
    json_page(Page {
        items,
        total,
        page: 1,
        per_page: total,
        total_pages: usize::from(total > 0),
    })
}
