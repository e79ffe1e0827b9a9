use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response};
use axum::middleware::Next;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

pub fn security_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
        ),
    );

    response
}

pub async fn apply_security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let response = next.run(request).await;
    security_headers(response)
}

/// Counts attempts per key inside `window`. The attempt that brings the count to
/// `max_attempts` locks the key out for a full `window` from that moment.
pub struct RateLimiter {
    entries: RwLock<HashMap<String, Entry>>,
    max_attempts: usize,
    window: Duration,
}

#[derive(Default)]
struct Entry {
    attempts: Vec<Instant>,
    locked_until: Option<Instant>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_attempts: max_attempts.max(1),
            window,
        }
    }

    /// `None` when the key may proceed, otherwise how long until it may.
    pub fn retry_after(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let until = entries.get(key)?.locked_until?;
        if until > now {
            return Some(until - now);
        }
        entries.remove(key);
        None
    }

    pub fn record_attempt(&self, key: &str) {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let entry = entries.entry(key.to_string()).or_default();
        entry
            .attempts
            .retain(|t| now.duration_since(*t) < self.window);
        entry.attempts.push(now);

        if entry.attempts.len() >= self.max_attempts {
            entry.attempts.clear();
            entry.locked_until = Some(now + self.window);
        }
    }

    pub fn clear(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| {
            entry
                .attempts
                .retain(|t| now.duration_since(*t) < self.window);
            entry.locked_until.is_some_and(|until| until > now) || !entry.attempts.is_empty()
        });
    }
}
