//! Business logic layer for board-service
//!
//! - Post service: creation, retrieval, and the ownership/role authorization
//!   that guards edits and deletes
//! - Comment service: save/delete passthrough
pub mod comments;
pub mod posts;

pub use comments::CommentService;
pub use posts::PostService;
