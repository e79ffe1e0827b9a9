use super::handlers;
use super::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::public::health))
        .route("/api/blog/posts", get(handlers::public::list_posts))
        .route("/api/blog/post/:slug", get(handlers::public::get_post))
        .route("/api/blog/categories", get(handlers::public::list_categories))
        .route("/api/blog/tags", get(handlers::public::list_tags))
        .route("/api/portfolio/projects", get(handlers::portfolio::projects))
        .route("/api/cv", get(handlers::portfolio::cv))
        .route("/api/contact", post(handlers::contact::submit))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog/posts", post(handlers::admin::create_post))
        .route(
            "/api/blog/posts/:id",
            put(handlers::admin::update_post).delete(handlers::admin::delete_post),
        )
        .route("/api/blog/categories", post(handlers::admin::create_category))
        .route(
            "/api/blog/categories/:id",
            put(handlers::admin::update_category).delete(handlers::admin::delete_category),
        )
        .route("/api/admin/posts", get(handlers::admin::list_posts))
        .route("/api/admin/posts/:id", get(handlers::admin::get_post))
        .route("/api/admin/messages", get(handlers::admin::list_messages))
}

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/setup", post(handlers::auth::setup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
}
