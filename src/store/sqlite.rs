use super::ContentStore;
use crate::models::{
    BlogPost, Category, CategoryColor, CreateCategory, CreatePost, PostScope, UpdateCategory,
    UpdatePost,
};
use crate::services::posts::PostDefaults;
use crate::services::{categories, posts};
use crate::Database;
use anyhow::Result;

pub struct SqliteStore {
    db: Database,
    defaults: PostDefaults,
}

impl SqliteStore {
    pub fn new(db: Database, defaults: PostDefaults) -> Self {
        Self { db, defaults }
    }

    fn default_color(&self) -> CategoryColor {
        self.defaults.category_color
    }
}

impl ContentStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn list_posts(&self, scope: PostScope) -> Result<Vec<BlogPost>> {
        posts::list_posts(&self.db, scope)
    }

    fn get_post(&self, id: &str) -> Result<Option<BlogPost>> {
        posts::get_post(&self.db, id)
    }

    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        posts::get_post_by_slug(&self.db, slug)
    }

    fn create_post(&self, input: CreatePost) -> Result<BlogPost> {
        posts::create_post(&self.db, input, &self.defaults)
    }

    fn update_post(&self, id: &str, input: UpdatePost) -> Result<BlogPost> {
        posts::update_post(&self.db, id, input, &self.defaults)
    }

    fn delete_post(&self, id: &str) -> Result<bool> {
        posts::delete_post(&self.db, id)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        categories::list_categories(&self.db)
    }

    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        categories::get_category(&self.db, id)
    }

    fn create_category(&self, input: CreateCategory) -> Result<Category> {
        categories::create_category(&self.db, input, self.default_color())
    }

    fn update_category(&self, id: &str, input: UpdateCategory) -> Result<Category> {
        categories::update_category(&self.db, id, input)
    }

    fn delete_category(&self, id: &str) -> Result<bool> {
        categories::delete_category(&self.db, id)
    }
}
