use super::{ContentStore, MockStore};
use crate::models::{
    BlogPost, Category, CreateCategory, CreatePost, PostScope, UpdateCategory, UpdatePost,
};
use anyhow::Result;

/// Serves reads from the mock dataset when the primary store fails.
///
/// Writes always go to the primary; a failed write is an error, never a silent no-op.
pub struct FallbackStore<P> {
    primary: P,
    mock: MockStore,
}

impl<P: ContentStore> FallbackStore<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            mock: MockStore,
        }
    }

    fn read<T>(
        &self,
        what: &str,
        primary: Result<T>,
        fallback: impl FnOnce(&MockStore) -> Result<T>,
    ) -> Result<T> {
        match primary {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    "{} store failed to {}, serving sample data: {:#}",
                    self.primary.name(),
                    what,
                    e
                );
                fallback(&self.mock)
            }
        }
    }
}

impl<P: ContentStore> ContentStore for FallbackStore<P> {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn list_posts(&self, scope: PostScope) -> Result<Vec<BlogPost>> {
        self.read("list posts", self.primary.list_posts(scope), |m| {
            m.list_posts(scope)
        })
    }

    fn get_post(&self, id: &str) -> Result<Option<BlogPost>> {
        self.read("load post", self.primary.get_post(id), |m| m.get_post(id))
    }

    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        self.read("load post", self.primary.get_post_by_slug(slug), |m| {
            m.get_post_by_slug(slug)
        })
    }

    fn create_post(&self, input: CreatePost) -> Result<BlogPost> {
        self.primary.create_post(input)
    }

    fn update_post(&self, id: &str, input: UpdatePost) -> Result<BlogPost> {
        self.primary.update_post(id, input)
    }

    fn delete_post(&self, id: &str) -> Result<bool> {
        self.primary.delete_post(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        self.read("list categories", self.primary.list_categories(), |m| {
            m.list_categories()
        })
    }

    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        self.read("load category", self.primary.get_category(id), |m| {
            m.get_category(id)
        })
    }

    fn create_category(&self, input: CreateCategory) -> Result<Category> {
        self.primary.create_category(input)
    }

    fn update_category(&self, id: &str, input: UpdateCategory) -> Result<Category> {
        self.primary.update_category(id, input)
    }

    fn delete_category(&self, id: &str) -> Result<bool> {
        self.primary.delete_category(id)
    }
}
