//! Axum extractors for request handling
//!
//! Custom extractors for authentication, path ids and JSON bodies.

mod auth;
mod json;
mod path;

pub use auth::{AuthUser, OptionalAuthUser};
pub use json::JsonBody;
pub use path::{ChannelIdPath, ChannelMemberPath, MessageIdPath};
