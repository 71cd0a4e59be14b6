//! Database access layer
//!
//! Repository traits describe the persistence contract the service depends
//! on (save / find / update / delete); the `Pg*` types implement them with
//! sqlx against Postgres. Tests substitute in-memory implementations.
pub mod comment_repo;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::{CommentRepository, PgCommentRepository};
pub use post_repo::{PgPostRepository, PostRepository};
pub use user_repo::{PgUserRepository, UserRepository};
