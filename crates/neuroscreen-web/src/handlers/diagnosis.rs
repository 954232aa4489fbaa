//! Symptom checklist and diagnosis submission.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::Form;
use minijinja::context;
use neuroscreen_common::ApiError;
use neuroscreen_db::SymptomRepository;
use neuroscreen_ranker::{run_diagnosis, DiagnosisError, DiagnosisRequest};
use neuroscreen_security::SessionUser;
use serde::Deserialize;
use tracing::debug;
use crate::session::RequireUser;
use crate::state::SharedState;

/// Checked boxes arrive as repeated `symptoms` fields.
#[derive(Debug, Deserialize, Default)]
pub struct DiagnosisForm {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

async fn render_form(
    state: &SharedState,
    user: &SessionUser,
    selected: &[String],
    error: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let symptoms = SymptomRepository::new(state.db.clone()).list("").await?;
    state.templates.render("diagnosis.html", context! {
        title => "Diagnosis",
        user => user,
        symptoms => symptoms,
        selected => selected,
        error => error,
    })
}

/// GET /diagnosis
pub async fn diagnosis_page(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>, ApiError> {
    render_form(&state, &user, &[], None).await
}

/// POST /diagnosis
pub async fn diagnosis_submit(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
    Form(form): Form<DiagnosisForm>,
) -> Result<Response, ApiError> {
    let request = DiagnosisRequest { requester_id: user.id, symptom_ids: form.symptoms };

    match run_diagnosis(state.knowledge.as_ref(), &request).await {
        Ok(outcome) => {
            let html = state.templates.render("result.html", context! {
                title => "Diagnosis Result",
                user => &user,
                outcome => outcome,
            })?;
            Ok(html.into_response())
        }
        Err(DiagnosisError::Store(e)) => Err(DiagnosisError::Store(e).into()),
        Err(e) => {
            debug!(user_id = user.id, error = %e, "Diagnosis rejected");
            let html = render_form(&state, &user, &request.symptom_ids, Some(&e.to_string())).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
    }
}
