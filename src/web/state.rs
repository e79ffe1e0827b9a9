use crate::models::{BlogPost, Category, Portfolio, PostScope};
use crate::services::cache::QueryCache;
use crate::services::posts::PostDefaults;
use crate::services::tags::{self, TagCount};
use crate::services::webhook::WebhookTarget;
use crate::store::{DynStore, FallbackStore, SqliteStore};
use crate::web::security::RateLimiter;
use crate::{services, Config, Database};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const CATEGORIES_KEY: &str = "categories";
const TAGS_KEY: &str = "tags";
const LOGIN_LOCKOUT: Duration = Duration::from_secs(15 * 60);
const MAX_LOGIN_FAILURES: usize = 5;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub store: DynStore,
    pub portfolio: Portfolio,
    pub webhook: Option<WebhookTarget>,
    pub login_limiter: RateLimiter,
    pub contact_limiter: RateLimiter,
    posts: QueryCache<Vec<BlogPost>>,
    post: QueryCache<Option<BlogPost>>,
    categories: QueryCache<Vec<Category>>,
    tags: QueryCache<Vec<TagCount>>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let sqlite = SqliteStore::new(db.clone(), PostDefaults::from(&config.content));
        let store: DynStore = if config.store.fallback_to_mock {
            Arc::new(FallbackStore::new(sqlite))
        } else {
            Arc::new(sqlite)
        };
        let portfolio = services::portfolio::load(config.portfolio.data_path.as_deref().map(Path::new))?;
        Ok(Self::with_store(config, db, store, portfolio))
    }

    pub fn with_store(config: Config, db: Database, store: DynStore, portfolio: Portfolio) -> Self {
        let stale_time = if config.cache.enabled {
            config.stale_time()
        } else {
            Duration::ZERO
        };
        let retry = config.cache.retry;

        Self {
            webhook: WebhookTarget::from_config(&config.contact),
            login_limiter: RateLimiter::new(MAX_LOGIN_FAILURES, LOGIN_LOCKOUT),
            contact_limiter: RateLimiter::new(
                config.contact.max_per_hour,
                Duration::from_secs(3600),
            ),
            posts: QueryCache::new(stale_time, retry),
            post: QueryCache::new(stale_time, retry),
            categories: QueryCache::new(stale_time, retry),
            tags: QueryCache::new(stale_time, retry),
            config,
            db,
            store,
            portfolio,
        }
    }

    /// Shortens the cache retry backoff. Used by tests.
    pub fn with_retry_base(mut self, base: Duration) -> Self {
        self.posts = self.posts.with_retry_base(base);
        self.post = self.post.with_retry_base(base);
        self.categories = self.categories.with_retry_base(base);
        self.tags = self.tags.with_retry_base(base);
        self
    }

    pub async fn posts(&self, scope: PostScope) -> Result<Vec<BlogPost>> {
        self.posts
            .get_or_fetch(scope.cache_key(), || async { self.store.list_posts(scope) })
            .await
    }

    /// Misses are not kept, so unknown slugs cannot grow the cache.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let key = format!("post:slug:{}", slug);
        let post = self
            .post
            .get_or_fetch(&key, || async { self.store.get_post_by_slug(slug) })
            .await?;
        if post.is_none() {
            self.post.remove(&key);
        }
        Ok(post)
    }

    pub async fn post_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        let key = format!("post:id:{}", id);
        let post = self
            .post
            .get_or_fetch(&key, || async { self.store.get_post(id) })
            .await?;
        if post.is_none() {
            self.post.remove(&key);
        }
        Ok(post)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.categories
            .get_or_fetch(CATEGORIES_KEY, || async { self.store.list_categories() })
            .await
    }

    pub async fn tags(&self) -> Result<Vec<TagCount>> {
        self.tags
            .get_or_fetch(TAGS_KEY, || async {
                let published = self.posts(PostScope::Published).await?;
                Ok::<_, anyhow::Error>(tags::tag_counts(&published))
            })
            .await
    }

    /// Number of cached reads across all query caches.
    pub fn cached_entries(&self) -> usize {
        self.posts.len() + self.post.len() + self.categories.len() + self.tags.len()
    }

    /// Drops expired cache entries. Returns how many were dropped.
    pub fn evict_stale(&self) -> usize {
        self.posts.evict_stale()
            + self.post.evict_stale()
            + self.categories.evict_stale()
            + self.tags.evict_stale()
    }

    /// Drops every cached read a post or category mutation can affect.
    pub fn invalidate_content(&self) {
        self.posts.invalidate("posts:");
        self.post.invalidate("post:");
        self.categories.invalidate(CATEGORIES_KEY);
        self.tags.invalidate(TAGS_KEY);
    }
}
