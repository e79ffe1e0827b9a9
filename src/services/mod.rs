pub mod auth;
pub mod cache;
pub mod categories;
pub mod contact;
pub mod error;
pub mod html;
pub mod listing;
pub mod portfolio;
pub mod posts;
pub mod slug;
pub mod tags;
pub mod webhook;

pub use error::ContentError;
