//! User dashboard.

use axum::{extract::State, response::Html};
use minijinja::context;
use neuroscreen_common::ApiError;
use neuroscreen_db::DiagnosisRepository;
use crate::handlers::history::HistoryRow;
use crate::session::RequireUser;
use crate::state::SharedState;

/// Most recent diagnoses shown on the dashboard.
const RECENT_LIMIT: usize = 5;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>, ApiError> {
    let history = DiagnosisRepository::new(state.db.clone())
        .list_for_user(user.id)
        .await?;
    let total = history.len();
    let recent: Vec<HistoryRow> = history
        .into_iter()
        .take(RECENT_LIMIT)
        .map(HistoryRow::from)
        .collect();

    state.templates.render("dashboard.html", context! {
        title => "Dashboard",
        user => user,
        total => total,
        recent => recent,
    })
}
