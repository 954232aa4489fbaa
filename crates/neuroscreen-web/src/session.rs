//! Session cookie handling and role guards.
//!
//! `RequireUser` / `RequireAdmin` reject unauthenticated requests with a
//! redirect to the matching login page and wrong-role requests with 403.

use crate::state::SharedState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use neuroscreen_common::{ApiError, Role};
use neuroscreen_security::SessionUser;
use std::convert::Infallible;
use tracing::warn;

pub const FORBIDDEN_MESSAGE: &str = "You do not have access.";

/// Login page for a role.
pub fn login_path(role: Role) -> &'static str {
    match role {
        Role::User  => "/login",
        Role::Admin => "/admin/login",
    }
}

/// Landing page after login for a role.
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::User  => "/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}

/// Cookie carrying a fresh session token.
pub fn session_cookie(state: &SharedState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.secure_cookie)
        .build()
}

/// Cookie that clears the session on the client.
pub fn removal_cookie(state: &SharedState) -> Cookie<'static> {
    Cookie::build((state.config.session.cookie_name.clone(), ""))
        .path("/")
        .build()
}

/// Session token from the request cookies, if any.
pub fn session_token(parts: &Parts, state: &SharedState) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(&state.config.session.cookie_name)
        .map(|c| c.value().to_string())
}

/// The logged-in user, if the request carries a live session.
pub struct CurrentUser(pub Option<SessionUser>);

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let user = match session_token(parts, state) {
            Some(token) => state.sessions.get(&token).await,
            None => None,
        };
        Ok(CurrentUser(user))
    }
}

/// Why a role guard refused the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// No live session: send the browser to this login page.
    Login(&'static str),
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Login(path) => Redirect::to(path).into_response(),
            AuthRejection::Forbidden => ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string()).into_response(),
        }
    }
}

async fn require_role(parts: &mut Parts, state: &SharedState, role: Role) -> Result<SessionUser, AuthRejection> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
        .await
        .unwrap_or(CurrentUser(None));
    match user {
        None => Err(AuthRejection::Login(login_path(role))),
        Some(u) if u.role == role => Ok(u),
        Some(u) => {
            warn!(user_id = u.id, path = %parts.uri.path(), required = %role, "Role check failed");
            Err(AuthRejection::Forbidden)
        }
    }
}

/// A logged-in account with role `user`.
pub struct RequireUser(pub SessionUser);

impl FromRequestParts<SharedState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::User).await.map(RequireUser)
    }
}

/// A logged-in account with role `admin`.
pub struct RequireAdmin(pub SessionUser);

impl FromRequestParts<SharedState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(RequireAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_paths_per_role() {
        assert_eq!(login_path(Role::User), "/login");
        assert_eq!(login_path(Role::Admin), "/admin/login");
        assert_eq!(home_path(Role::Admin), "/admin/dashboard");
    }

    #[test]
    fn test_rejection_responses() {
        let resp = AuthRejection::Login("/admin/login").into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()["location"], "/admin/login");

        let resp = AuthRejection::Forbidden.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
