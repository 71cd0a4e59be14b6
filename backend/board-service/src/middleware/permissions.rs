//! Authorization module for board-service
//!
//! Ownership/role decisions for mutating post operations. The decision is a
//! pure function of (role, actor id, owner id) and is re-derived on every
//! call; results are never cached across requests.
use crate::error::AppError;
use crate::models::{Post, Role};
use crate::session::SessionUser;
use uuid::Uuid;

/// Decide whether an actor may mutate a resource owned by `owner_id`.
///
/// Administrators may mutate anything; everyone else only their own
/// resources.
pub fn can_modify(role: Role, actor_id: Uuid, owner_id: Uuid) -> bool {
    role.is_admin() || actor_id == owner_id
}

/// Validate that `user` may edit or delete `post`.
///
/// Denial maps to 401, matching the original contract that does not
/// distinguish missing identity from insufficient permission.
pub fn check_post_access(user: &SessionUser, post: &Post) -> Result<(), AppError> {
    if can_modify(user.role, user.id, post.user_id) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "you are not allowed to modify this post".to_string(),
        ))
    }
}
