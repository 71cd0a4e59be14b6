//! In-memory fixtures for integration tests
//!
//! Provides in-memory repository and session-store implementations so the
//! HTTP surface can be exercised without Postgres or Redis. Repositories
//! track call counts where tests need to assert that a handler never
//! reached persistence.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use async_trait::async_trait;
use board_service::db::{CommentRepository, PostRepository, UserRepository};
use board_service::error::{AppError, Result};
use board_service::handlers;
use board_service::middleware::SessionIdentity;
use board_service::models::{Comment, Post, PostType, Role, User};
use board_service::session::{SessionUser, Sessions};
use chrono::Utc;
use session_store::{MemorySessionStore, SessionStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepo {
    posts: Mutex<HashMap<Uuid, Post>>,
    find_by_user_calls: AtomicUsize,
}

impl InMemoryPostRepo {
    pub fn insert(&self, post: Post) {
        self.posts.lock().unwrap().insert(post.id, post);
    }

    pub fn get(&self, post_id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&post_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    /// Number of `find_by_user` calls, for asserting a gated handler never
    /// executed.
    pub fn find_by_user_calls(&self) -> usize {
        self.find_by_user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepo {
    async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        post_type: PostType,
    ) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            post_type,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.insert(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.get(post_id))
    }

    async fn find_all(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_by_type(&self, post_type: PostType) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.post_type == post_type)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.find_by_user_calls.fetch_add(1, Ordering::SeqCst);
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn update_content(&self, post_id: Uuid, title: &str, content: &str) -> Result<bool> {
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post_id) {
            Some(post) => {
                post.title = title.to_string();
                post.content = content.to_string();
                post.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, post_id: Uuid) -> Result<bool> {
        Ok(self.posts.lock().unwrap().remove(&post_id).is_some())
    }
}

/// In-memory comment repository.
#[derive(Default)]
pub struct InMemoryCommentRepo {
    comments: Mutex<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepo {
    pub fn insert(&self, comment: Comment) {
        self.comments.lock().unwrap().insert(comment.id, comment);
    }

    pub fn len(&self) -> usize {
        self.comments.lock().unwrap().len()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepo {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.insert(comment.clone());
        Ok(comment)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn delete(&self, comment_id: Uuid) -> Result<bool> {
        Ok(self.comments.lock().unwrap().remove(&comment_id).is_some())
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// Shared fixtures for one test.
pub struct TestContext {
    pub posts: Arc<InMemoryPostRepo>,
    pub comments: Arc<InMemoryCommentRepo>,
    pub users: Arc<InMemoryUserRepo>,
    pub store: Arc<MemorySessionStore>,
    pub sessions: Sessions,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemorySessionStore::new());
        let sessions = Sessions::new(
            store.clone() as Arc<dyn SessionStore>,
            Duration::from_secs(60),
        );

        Self {
            posts: Arc::new(InMemoryPostRepo::default()),
            comments: Arc::new(InMemoryCommentRepo::default()),
            users: Arc::new(InMemoryUserRepo::default()),
            store,
            sessions,
        }
    }

    pub fn seed_user(&self, username: &str, role: Role) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        self.users.insert(user.clone());
        user
    }

    pub fn seed_post(&self, owner: &User, post_type: PostType, title: &str) -> Post {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "content".to_string(),
            post_type,
            user_id: owner.id,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.clone());
        post
    }

    /// Establish a session for `user` and return its id.
    pub async fn login(&self, user: &User) -> String {
        let marker = SessionUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        };
        self.sessions.create(&marker).await.unwrap()
    }
}

/// Build the full application with in-memory collaborators.
pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let posts: Arc<dyn PostRepository> = ctx.posts.clone();
    let comments: Arc<dyn CommentRepository> = ctx.comments.clone();
    let users: Arc<dyn UserRepository> = ctx.users.clone();

    test::init_service(
        App::new()
            .app_data(web::Data::from(posts))
            .app_data(web::Data::from(comments))
            .app_data(web::Data::from(users))
            .app_data(web::Data::new(ctx.sessions.clone()))
            .wrap(SessionIdentity::new(ctx.sessions.clone()))
            .configure(handlers::configure),
    )
    .await
}
