//! Auth handlers - registration and session lifecycle
//!
//! Login stores an authenticated-user marker in the session store and hands
//! the session id to the client as an http-only cookie. Logout destroys the
//! marker. Everything in between is the middleware's business.
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::Role;
use crate::security::{hash_password, verify_password};
use crate::session::{SessionUser, Sessions, SESSION_COOKIE};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Register a new account. New accounts always get the regular role.
pub async fn register(
    users: web::Data<dyn UserRepository>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let password_hash = hash_password(&req.password)?;
    let user = users.create(&req.username, &password_hash, Role::User).await?;

    Ok(HttpResponse::Created().json(user))
}

/// Log in and establish a session.
pub async fn login(
    users: web::Data<dyn UserRepository>,
    sessions: web::Data<Sessions>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    // Same error for unknown user and bad password
    let user = users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    verify_password(&req.password, &user.password_hash)?;

    let marker = SessionUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    let session_id = sessions.create(&marker).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    let cookie = Cookie::build(SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(marker))
}

/// Log out and destroy the session marker.
pub async fn logout(sessions: web::Data<Sessions>, req: HttpRequest) -> Result<HttpResponse> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.destroy(cookie.value()).await?;
    }

    let removal = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::ZERO)
        .finish();

    Ok(HttpResponse::NoContent().cookie(removal).finish())
}
