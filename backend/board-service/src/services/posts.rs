//! Post service - post lifecycle and the authorization check guarding
//! mutations.
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_post_access;
use crate::models::{Post, PostType};
use crate::session::SessionUser;
use std::sync::Arc;
use uuid::Uuid;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>> {
        self.posts.find_all().await
    }

    /// List posts of one category, newest first.
    pub async fn list_by_type(&self, post_type: PostType) -> Result<Vec<Post>> {
        self.posts.find_by_type(post_type).await
    }

    /// List posts owned by a user, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.posts.find_by_user(user_id).await
    }

    /// Get a post by id.
    pub async fn get(&self, post_id: Uuid) -> Result<Option<Post>> {
        self.posts.find_by_id(post_id).await
    }

    /// Create a post owned by the acting user. The category comes from the
    /// endpoint invoked, never from client input.
    pub async fn create(
        &self,
        actor: &SessionUser,
        title: &str,
        content: &str,
        post_type: PostType,
    ) -> Result<Post> {
        self.posts.create(actor.id, title, content, post_type).await
    }

    /// Edit a post's title and content after the ownership/role check.
    ///
    /// The decision is re-derived from the current owner on every call. The
    /// lookup and the update are separate statements; a post deleted in
    /// between surfaces as not-found rather than a phantom success.
    pub async fn edit(
        &self,
        actor: &SessionUser,
        post_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {} does not exist", post_id)))?;

        check_post_access(actor, &post)?;

        let updated = self.posts.update_content(post_id, title, content).await?;
        if !updated {
            return Err(AppError::NotFound(format!("post {} does not exist", post_id)));
        }

        Ok(())
    }

    /// Delete a post after the ownership/role check.
    pub async fn delete(&self, actor: &SessionUser, post_id: Uuid) -> Result<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {} does not exist", post_id)))?;

        check_post_access(actor, &post)?;

        let deleted = self.posts.delete(post_id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("post {} does not exist", post_id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::post_repo::MockPostRepository;
    use crate::models::Role;
    use chrono::Utc;

    fn post_owned_by(owner: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "title".to_string(),
            content: "content".to_string(),
            post_type: PostType::Question,
            user_id: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn session_user(id: Uuid, role: Role) -> SessionUser {
        SessionUser {
            id,
            username: "someone".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn edit_by_non_owner_is_denied_without_touching_persistence() {
        let owner = Uuid::new_v4();
        let intruder = session_user(Uuid::new_v4(), Role::User);
        let post = post_owned_by(owner);
        let post_id = post.id;

        let mut repo = MockPostRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        repo.expect_update_content().never();

        let service = PostService::new(Arc::new(repo));
        let err = service
            .edit(&intruder, post_id, "new", "new")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admin_may_edit_any_post() {
        let owner = Uuid::new_v4();
        let admin = session_user(Uuid::new_v4(), Role::Admin);
        let post = post_owned_by(owner);
        let post_id = post.id;

        let mut repo = MockPostRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        repo.expect_update_content().returning(|_, _, _| Ok(true));

        let service = PostService::new(Arc::new(repo));
        assert!(service.edit(&admin, post_id, "new", "new").await.is_ok());
    }

    #[tokio::test]
    async fn edit_of_missing_post_is_not_found() {
        let actor = session_user(Uuid::new_v4(), Role::User);

        let mut repo = MockPostRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update_content().never();

        let service = PostService::new(Arc::new(repo));
        let err = service
            .edit(&actor, Uuid::new_v4(), "new", "new")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_by_owner_succeeds() {
        let owner_id = Uuid::new_v4();
        let owner = session_user(owner_id, Role::User);
        let post = post_owned_by(owner_id);
        let post_id = post.id;

        let mut repo = MockPostRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        repo.expect_delete().returning(|_| Ok(true));

        let service = PostService::new(Arc::new(repo));
        assert!(service.delete(&owner, post_id).await.is_ok());
    }

    #[tokio::test]
    async fn create_attributes_post_to_actor() {
        let actor = session_user(Uuid::new_v4(), Role::User);
        let actor_id = actor.id;

        let mut repo = MockPostRepository::new();
        repo.expect_create()
            .withf(move |user_id, _, _, post_type| {
                *user_id == actor_id && *post_type == PostType::Announcement
            })
            .returning(|user_id, title, content, post_type| {
                Ok(Post {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    content: content.to_string(),
                    post_type,
                    user_id,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let service = PostService::new(Arc::new(repo));
        let post = service
            .create(&actor, "hello", "world", PostType::Announcement)
            .await
            .unwrap();

        assert_eq!(post.user_id, actor_id);
        assert_eq!(post.post_type, PostType::Announcement);
    }
}
