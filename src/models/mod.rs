mod category;
mod contact;
mod portfolio;
mod post;
mod user;

pub use category::*;
pub use contact::*;
pub use portfolio::*;
pub use post::*;
pub use user::*;
