//! Post handlers - HTTP endpoints for post operations
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Comment, Post, PostType};
use crate::services::{CommentService, PostService};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub title: String,
    pub content: String,
}

/// A post together with its comments, for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// List all posts
pub async fn list_posts(posts: web::Data<dyn PostRepository>) -> Result<HttpResponse> {
    let service = PostService::new(posts.into_inner());
    let posts = service.list().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// List announcement posts
pub async fn list_announcements(posts: web::Data<dyn PostRepository>) -> Result<HttpResponse> {
    let service = PostService::new(posts.into_inner());
    let posts = service.list_by_type(PostType::Announcement).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// List question posts
pub async fn list_questions(posts: web::Data<dyn PostRepository>) -> Result<HttpResponse> {
    let service = PostService::new(posts.into_inner());
    let posts = service.list_by_type(PostType::Question).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Create an announcement post
pub async fn create_announcement(
    posts: web::Data<dyn PostRepository>,
    user: Option<AuthUser>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    save_post(posts, user, req.into_inner(), PostType::Announcement).await
}

/// Create a question post
pub async fn create_question(
    posts: web::Data<dyn PostRepository>,
    user: Option<AuthUser>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    save_post(posts, user, req.into_inner(), PostType::Question).await
}

async fn save_post(
    posts: web::Data<dyn PostRepository>,
    user: Option<AuthUser>,
    req: CreatePostRequest,
    post_type: PostType,
) -> Result<HttpResponse> {
    // Handler-level presence check, independent of the login gate
    let AuthUser(user) =
        user.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = PostService::new(posts.into_inner());
    let post = service
        .create(&user, &req.title, &req.content, post_type)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post with its comments
pub async fn get_post(
    posts: web::Data<dyn PostRepository>,
    comments: web::Data<dyn CommentRepository>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let posts = posts.into_inner();
    let service = PostService::new(posts.clone());

    let post = service
        .get(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} does not exist", post_id)))?;

    let comment_service = CommentService::new(comments.into_inner(), posts);
    let comments = comment_service.list_for_post(post.id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse { post, comments }))
}

/// Edit a post's title and content. Owner or admin only.
pub async fn edit_post(
    posts: web::Data<dyn PostRepository>,
    post_id: web::Path<Uuid>,
    user: Option<AuthUser>,
    req: web::Json<EditPostRequest>,
) -> Result<HttpResponse> {
    let AuthUser(user) =
        user.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    let service = PostService::new(posts.into_inner());
    service.edit(&user, *post_id, &req.title, &req.content).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Delete a post. Owner or admin only.
pub async fn delete_post(
    posts: web::Data<dyn PostRepository>,
    post_id: web::Path<Uuid>,
    user: Option<AuthUser>,
) -> Result<HttpResponse> {
    let AuthUser(user) =
        user.ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    let service = PostService::new(posts.into_inner());
    service.delete(&user, *post_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// List the caller's posts. Sits behind the login gate, so the identity is
/// always present here.
pub async fn my_posts(
    posts: web::Data<dyn PostRepository>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = PostService::new(posts.into_inner());
    let posts = service.list_by_user(user.0.id).await?;

    Ok(HttpResponse::Ok().json(posts))
}
