use thiserror::Error;

/// Domain failures the web layer maps onto client-facing status codes.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid slug '{0}': use 1-200 lowercase letters, numbers and hyphens")]
    InvalidSlug(String),
    #[error("slug '{0}' is already in use")]
    DuplicateSlug(String),
    #[error("a category named '{0}' already exists")]
    DuplicateCategory(String),
    #[error("{0}")]
    Validation(String),
    #[error("this store is read-only")]
    ReadOnly,
}

impl ContentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
