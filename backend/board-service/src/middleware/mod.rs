//! HTTP middleware for board-service
//!
//! Two pieces cooperate to enforce authentication:
//!
//! - `SessionIdentity` resolves the session cookie and attaches the
//!   authenticated-user marker to request extensions. It never rejects.
//! - `LoginGate` short-circuits requests on protected scopes with a redirect
//!   to the login endpoint when no marker is attached.
//!
//! Handlers read the marker through the `AuthUser` extractor; handlers that
//! tolerate anonymous callers take `Option<AuthUser>` and decide themselves.
pub mod permissions;

pub use permissions::*;

use crate::session::{SessionUser, Sessions, SESSION_COOKIE};
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

// =====================================================================
// Session identity
// =====================================================================

/// Authenticated-user marker stored in request extensions after session
/// resolution.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

/// Actix middleware that resolves the session cookie into an `AuthUser`.
///
/// Absence of a cookie, an unknown session id, and a failing store all leave
/// the request without an identity; rejection is someone else's decision.
pub struct SessionIdentity {
    sessions: Sessions,
}

impl SessionIdentity {
    pub fn new(sessions: Sessions) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionIdentityService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityService {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct SessionIdentityService<S> {
    service: Rc<S>,
    sessions: Sessions,
}

impl<S, B> Service<ServiceRequest> for SessionIdentityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let sessions = self.sessions.clone();

        Box::pin(async move {
            let session_id = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

            if let Some(session_id) = session_id {
                if let Some(user) = sessions.resolve(&session_id).await {
                    req.extensions_mut().insert(AuthUser(user));
                }
            }

            service.call(req).await
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("authentication required")),
        )
    }
}

// =====================================================================
// Login gate
// =====================================================================

/// Actix middleware that denies unauthenticated requests on protected
/// scopes by redirecting to `/login?redirectURL=<original path>`.
///
/// The wrapped handler never runs on a denied request. Must sit inside
/// `SessionIdentity`, which populates the marker this gate checks.
pub struct LoginGate;

impl<S, B> Transform<S, ServiceRequest> for LoginGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LoginGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoginGateService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoginGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoginGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authenticated = req.extensions().get::<AuthUser>().is_some();

        if authenticated {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) });
        }

        let path = req.path().to_string();
        tracing::debug!(%path, "unauthenticated request on protected path, redirecting");

        Box::pin(async move {
            let (req, _) = req.into_parts();
            let response = HttpResponse::Found()
                .insert_header((
                    header::LOCATION,
                    format!("/login?redirectURL={}", path),
                ))
                .finish()
                .map_into_right_body();

            Ok(ServiceResponse::new(req, response))
        })
    }
}
