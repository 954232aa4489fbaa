//! Public pages.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use neuroscreen_common::ApiError;
use crate::session::{home_path, CurrentUser};
use crate::state::SharedState;

/// GET / - landing page; logged-in visitors go to their dashboard.
pub async fn landing(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    if let Some(user) = user {
        return Ok(Redirect::to(home_path(user.role)).into_response());
    }
    Ok(state.templates.render("home.html", context! { title => "NeuroScreen" })?.into_response())
}

/// GET /about
pub async fn about(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    Ok(state
        .templates
        .render("about.html", context! { title => "About", user => user })?
        .into_response())
}
