//! Comment service - save/delete passthrough over the comment repository.
//!
//! Comments only validate that their parent post exists; ownership rules do
//! not apply here.
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::models::Comment;
use crate::session::SessionUser;
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Attach a comment to a post. 404s when the post does not exist.
    pub async fn add(&self, actor: &SessionUser, post_id: Uuid, content: &str) -> Result<Comment> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {} does not exist", post_id)))?;

        self.comments.create(post_id, actor.id, content).await
    }

    /// List comments for a post, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.comments.find_by_post(post_id).await
    }

    /// Remove a comment. 404s when the id is unknown.
    pub async fn remove(&self, comment_id: Uuid) -> Result<()> {
        let deleted = self.comments.delete(comment_id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "comment {} does not exist",
                comment_id
            )));
        }

        Ok(())
    }
}
