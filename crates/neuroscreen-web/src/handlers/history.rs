//! Diagnosis history for the logged-in user.

use axum::{
    extract::{Path, State},
    response::Html,
};
use minijinja::context;
use neuroscreen_common::{ApiError, DiagnosisSummary, DiseaseInfo};
use neuroscreen_db::{DiagnosisRepository, DiseaseRepository};
use neuroscreen_ranker::classify;
use serde::Serialize;
use crate::session::RequireUser;
use crate::state::SharedState;

/// Display timestamp format.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One line of the history table.
#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub created_at: String,
    pub disease: String,
    pub cf: f64,
    pub percent: f64,
    pub label: String,
}

impl From<DiagnosisSummary> for HistoryRow {
    fn from(d: DiagnosisSummary) -> Self {
        let label = classify(d.cf_value);
        Self {
            id: d.id,
            created_at: d.created_at.format(DATE_FORMAT).to_string(),
            disease: d.disease_name.unwrap_or(d.disease_id),
            cf: d.cf_value,
            percent: label.percent,
            label: label.text(),
        }
    }
}

/// GET /history
pub async fn history(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>, ApiError> {
    let rows: Vec<HistoryRow> = DiagnosisRepository::new(state.db.clone())
        .list_for_user(user.id)
        .await?
        .into_iter()
        .map(HistoryRow::from)
        .collect();

    state.templates.render("history.html", context! {
        title => "History",
        user => user,
        rows => rows,
    })
}

/// GET /history/{id} - only the owner can see a diagnosis.
pub async fn history_detail(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let diagnoses = DiagnosisRepository::new(state.db.clone());
    let record = diagnoses
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Diagnosis not found.".to_string()))?;

    let disease = DiseaseRepository::new(state.db.clone())
        .get(&record.disease_id)
        .await?
        .map(DiseaseInfo::from)
        .unwrap_or_else(|| DiseaseInfo::placeholder(&record.disease_id));
    let symptoms = diagnoses.symptoms_for(record.id).await?;
    let label = classify(record.cf_value);
    let created_at = record.created_at.format(DATE_FORMAT).to_string();

    state.templates.render("history_detail.html", context! {
        title => "Diagnosis Detail",
        user => user,
        record => record,
        created_at => created_at,
        disease => disease,
        symptoms => symptoms,
        percent => label.percent,
        label => label.text(),
    })
}
