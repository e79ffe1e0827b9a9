use crate::models::CategoryColor;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the prebuilt front-end bundle, served for non-API paths.
    #[serde(default)]
    pub static_dir: Option<String>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Take the client address from `X-Forwarded-For` (only behind a trusted proxy).
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            trust_proxy_headers: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub default_category_color: CategoryColor,
    #[serde(default)]
    pub default_author: AuthorConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            max_per_page: default_max_per_page(),
            excerpt_length: default_excerpt_length(),
            default_category: default_category(),
            default_category_color: CategoryColor::default(),
            default_author: AuthorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorConfig {
    #[serde(default = "default_author_name")]
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: default_author_name(),
            bio: None,
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_stale_time")]
    pub stale_time_secs: u64,
    #[serde(default = "default_retry")]
    pub retry: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time_secs: default_stale_time(),
            retry: default_retry(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_true")]
    pub fallback_to_mock: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fallback_to_mock: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortfolioConfig {
    /// TOML file with `[[projects]]` and `[cv]`. Missing file means empty portfolio.
    #[serde(default)]
    pub data_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContactConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_contact_limit")]
    pub max_per_hour: usize,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
            webhook_secret: None,
            max_message_length: default_max_message_length(),
            max_per_hour: default_contact_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_lifetime")]
    pub session_lifetime: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime: default_session_lifetime(),
        }
    }
}

impl AuthConfig {
    /// Parses `session_lifetime` ("7d", "12h", "30") into whole days, at least 1.
    pub fn session_days(&self) -> i64 {
        let raw = self.session_lifetime.trim();
        let days = if let Some(d) = raw.strip_suffix('d') {
            d.parse::<i64>().ok()
        } else if let Some(h) = raw.strip_suffix('h') {
            h.parse::<i64>().ok().map(|h| (h + 23) / 24)
        } else {
            raw.parse::<i64>().ok()
        };
        days.unwrap_or(7).max(1)
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_pool_size() -> u32 {
    10
}

fn default_posts_per_page() -> usize {
    9
}

fn default_max_per_page() -> usize {
    50
}

fn default_excerpt_length() -> usize {
    160
}

fn default_category() -> String {
    "General".to_string()
}

fn default_author_name() -> String {
    "Admin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_stale_time() -> u64 {
    300
}

fn default_retry() -> u32 {
    3
}

fn default_max_message_length() -> usize {
    5000
}

fn default_contact_limit() -> usize {
    5
}

fn default_session_lifetime() -> String {
    "7d".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run `folio init` to create one.",
                path.display(),
                e
            )
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var("FOLIO_CONTACT_WEBHOOK_SECRET") {
            if !secret.is_empty() {
                self.contact.webhook_secret = Some(secret);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.posts_per_page == 0 {
            anyhow::bail!("content.posts_per_page must be greater than 0");
        }
        if self.content.max_per_page < self.content.posts_per_page {
            anyhow::bail!("content.max_per_page must be at least content.posts_per_page");
        }
        if self.content.max_per_page > 100 {
            anyhow::bail!("content.max_per_page must be 100 or less");
        }
        if self.content.excerpt_length == 0 {
            anyhow::bail!("content.excerpt_length must be greater than 0");
        }
        if self.content.default_category.trim().is_empty() {
            anyhow::bail!("content.default_category cannot be empty");
        }
        if url::Url::parse(&self.site.url).is_err() {
            anyhow::bail!("site.url '{}' is not a valid URL", self.site.url);
        }
        if let Some(ref hook) = self.contact.webhook_url {
            let parsed = url::Url::parse(hook)
                .map_err(|e| anyhow::anyhow!("contact.webhook_url is invalid: {}", e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("contact.webhook_url must use http or https");
            }
        }
        for origin in &self.server.cors_origins {
            if origin.trim() == "*" {
                anyhow::bail!(
                    "server.cors_origins cannot contain \"*\": session cookies need explicit origins"
                );
            }
            if url::Url::parse(origin).is_err() {
                anyhow::bail!("server.cors_origins entry '{}' is not a valid origin", origin);
            }
        }
        if self.contact.max_message_length == 0 {
            anyhow::bail!("contact.max_message_length must be greater than 0");
        }
        Ok(())
    }

    pub fn stale_time(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache.stale_time_secs)
    }
}
