//! HTTP handlers for board-service endpoints
//!
//! - Posts: public reads, authenticated creates, owner/admin edits and
//!   deletes
//! - Comments: passthrough create/delete
//! - Auth: register, login, logout (session lifecycle)
pub mod auth;
pub mod comments;
pub mod posts;

// Re-export handler functions at module level
pub use auth::{login, logout, register};
pub use comments::{create_comment, delete_comment};
pub use posts::{
    create_announcement, create_question, delete_post, edit_post, get_post, list_announcements,
    list_posts, list_questions, my_posts,
};

use crate::middleware::LoginGate;
use actix_web::web;

/// Register the service's routes. App data (repositories, sessions) is
/// supplied by the caller; tests plug in in-memory implementations.
///
/// Literal segments are registered before `{post_id}` so the category
/// routes are not swallowed by the id matcher.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout)),
    )
    .service(
        web::scope("/api/post")
            .service(web::resource("").route(web::get().to(list_posts)))
            .service(
                web::resource("/announcement")
                    .route(web::get().to(list_announcements))
                    .route(web::post().to(create_announcement)),
            )
            .service(
                web::resource("/question")
                    .route(web::get().to(list_questions))
                    .route(web::post().to(create_question)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(get_post))
                    .route(web::put().to(edit_post))
                    .route(web::delete().to(delete_post)),
            )
            .route("/{post_id}/comment", web::post().to(create_comment)),
    )
    .service(web::scope("/api/comment").route("/{comment_id}", web::delete().to(delete_comment)))
    .service(
        web::scope("/my")
            .wrap(LoginGate)
            .route("/posts", web::get().to(my_posts)),
    );
}
