//! Content store adapter.
//!
//! Handlers never talk to SQLite directly; they go through [`ContentStore`], so the
//! mock dataset can stand in when the primary store fails a read.

mod fallback;
mod mock;
mod sqlite;

pub use fallback::FallbackStore;
pub use mock::MockStore;
pub use sqlite::SqliteStore;

use crate::models::{
    BlogPost, Category, CreateCategory, CreatePost, PostScope, UpdateCategory, UpdatePost,
};
use crate::services::{categories, posts};
use crate::Database;
use anyhow::Result;
use std::sync::Arc;

pub trait ContentStore: Send + Sync {
    fn name(&self) -> &'static str;

    fn list_posts(&self, scope: PostScope) -> Result<Vec<BlogPost>>;
    fn get_post(&self, id: &str) -> Result<Option<BlogPost>>;
    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    fn create_post(&self, input: CreatePost) -> Result<BlogPost>;
    fn update_post(&self, id: &str, input: UpdatePost) -> Result<BlogPost>;
    /// `false` means there was nothing to delete.
    fn delete_post(&self, id: &str) -> Result<bool>;

    fn list_categories(&self) -> Result<Vec<Category>>;
    fn get_category(&self, id: &str) -> Result<Option<Category>>;
    fn create_category(&self, input: CreateCategory) -> Result<Category>;
    fn update_category(&self, id: &str, input: UpdateCategory) -> Result<Category>;
    fn delete_category(&self, id: &str) -> Result<bool>;
}

pub type DynStore = Arc<dyn ContentStore>;

/// Copies the sample dataset into an empty database. Returns (categories, posts) written.
pub fn seed_sample_content(db: &Database) -> Result<(usize, usize)> {
    let mut conn = db.get()?;
    let existing: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM blog_posts) + (SELECT COUNT(*) FROM categories)",
        [],
        |row| row.get(0),
    )?;
    if existing > 0 {
        anyhow::bail!("Database already has content; seeding only runs on an empty database");
    }

    let sample_categories = mock::categories();
    let sample_posts = mock::posts();

    let tx = conn.transaction()?;
    for category in &sample_categories {
        categories::insert_category(&tx, category)?;
    }
    for post in &sample_posts {
        posts::insert_post(&tx, post)?;
    }
    tx.commit()?;

    tracing::info!(
        "Seeded {} categories and {} posts",
        sample_categories.len(),
        sample_posts.len()
    );
    Ok((sample_categories.len(), sample_posts.len()))
}
