//! Login, registration and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use minijinja::context;
use neuroscreen_common::{ApiError, Role};
use neuroscreen_db::{DbError, UserRepository};
use neuroscreen_security::{hash_password, verify_password, SessionUser, MIN_PASSWORD_LEN};
use serde::Deserialize;
use tracing::{info, warn};
use crate::session::{home_path, login_path, removal_cookie, session_cookie, CurrentUser};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Field checks that need no database access.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err("All fields are required.");
        }
        if self.password != self.confirm_password {
            return Err("Password confirmation does not match.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters.");
        }
        Ok(())
    }
}

fn render_login(
    state: &SharedState,
    role: Role,
    status: StatusCode,
    error: Option<&str>,
    notice: Option<&str>,
    username: &str,
) -> Result<Response, ApiError> {
    let title = match role {
        Role::User  => "Login",
        Role::Admin => "Administrator Login",
    };
    let html = state.templates.render("login.html", context! {
        title => title,
        action => login_path(role),
        allow_register => role == Role::User,
        error => error,
        notice => notice,
        username => username,
    })?;
    Ok((status, html).into_response())
}

async fn login_page_for(state: &SharedState, user: Option<SessionUser>, role: Role, notice: Option<&str>) -> Result<Response, ApiError> {
    if let Some(user) = user {
        return Ok(Redirect::to(home_path(user.role)).into_response());
    }
    render_login(state, role, StatusCode::OK, None, notice, "")
}

/// GET /login
pub async fn login_page(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ApiError> {
    let notice = query.registered.map(|_| "Registration successful. Please log in.");
    login_page_for(&state, user, Role::User, notice).await
}

/// GET /admin/login
pub async fn admin_login_page(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    login_page_for(&state, user, Role::Admin, None).await
}

/// POST /login
pub async fn login_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    authenticate(&state, jar, form, Role::User).await
}

/// POST /admin/login
pub async fn admin_login_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    authenticate(&state, jar, form, Role::Admin).await
}

async fn authenticate(state: &SharedState, jar: CookieJar, form: LoginForm, role: Role) -> Result<Response, ApiError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return render_login(state, role, StatusCode::BAD_REQUEST, Some("Username and password are required."), None, username);
    }

    let creds = UserRepository::new(state.db.clone())
        .find_by_username(username, role)
        .await?;
    let verified = match &creds {
        Some(c) => verify_password(&form.password, &c.password_hash).unwrap_or_else(|e| {
            warn!(username, error = %e, "Stored password hash unreadable");
            false
        }),
        None => false,
    };

    let Some(creds) = creds.filter(|_| verified) else {
        warn!(username, role = %role, "Rejected login");
        return render_login(state, role, StatusCode::UNAUTHORIZED, Some("Invalid username or password."), None, username);
    };

    let user = SessionUser::from(creds.user);
    let user_id = user.id;
    let token = state.sessions.create(user).await;
    info!(user_id, role = %role, "Logged in");

    Ok((jar.add(session_cookie(state, token)), Redirect::to(home_path(role))).into_response())
}

/// GET /register
pub async fn register_page(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    if let Some(user) = user {
        return Ok(Redirect::to(home_path(user.role)).into_response());
    }
    Ok(state
        .templates
        .render("register.html", context! { title => "Register" })?
        .into_response())
}

/// POST /register
pub async fn register_submit(
    State(state): State<SharedState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let rerender = |error: &str| -> Result<Response, ApiError> {
        let html = state.templates.render("register.html", context! {
            title => "Register",
            error => error,
            name => form.name.trim(),
            username => form.username.trim(),
        })?;
        Ok((StatusCode::BAD_REQUEST, html).into_response())
    };

    if let Err(msg) = form.validate() {
        return rerender(msg);
    }

    let users = UserRepository::new(state.db.clone());
    let username = form.username.trim();
    if users.exists_username(username).await? {
        return rerender("Username is already taken.");
    }

    let hash = hash_password(&form.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    match users.create(form.name.trim(), username, &hash, Role::User).await {
        Ok(id) => {
            info!(user_id = id, "User registered");
            Ok(Redirect::to("/login?registered=1").into_response())
        }
        Err(DbError::Duplicate(_)) => rerender("Username is already taken."),
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state.sessions.destroy(cookie.value()).await;
    }
    (jar.remove(removal_cookie(&state)), Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, username: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: name.into(),
            username: username.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_registration_validation() {
        assert_eq!(form("Ana", "ana", "secret1", "secret1").validate(), Ok(()));
        assert_eq!(form(" ", "ana", "secret1", "secret1").validate(), Err("All fields are required."));
        assert_eq!(form("Ana", "ana", "secret1", "secret2").validate(), Err("Password confirmation does not match."));
        assert_eq!(form("Ana", "ana", "abc", "abc").validate(), Err("Password must be at least 6 characters."));
    }
}
