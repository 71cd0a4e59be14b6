//! Comment handlers - HTTP endpoints for comment operations
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Attach a comment to a post
pub async fn create_comment(
    comments: web::Data<dyn CommentRepository>,
    posts: web::Data<dyn PostRepository>,
    post_id: web::Path<Uuid>,
    user: Option<AuthUser>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let AuthUser(user) =
        user.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = CommentService::new(comments.into_inner(), posts.into_inner());
    let comment = service.add(&user, *post_id, &req.content).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment
pub async fn delete_comment(
    comments: web::Data<dyn CommentRepository>,
    posts: web::Data<dyn PostRepository>,
    comment_id: web::Path<Uuid>,
    user: Option<AuthUser>,
) -> Result<HttpResponse> {
    user.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    let service = CommentService::new(comments.into_inner(), posts.into_inner());
    service.remove(*comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
