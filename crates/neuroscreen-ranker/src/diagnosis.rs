//! Diagnosis orchestration: symptoms in, persisted best-matching disease out.

use crate::label::{classify, round_to};
use crate::ranking::{rank_candidates, Candidate, RankError, ScoredCandidate};
use crate::store::KnowledgeStore;
use neuroscreen_common::{ApiError, DiseaseInfo};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Decimal places kept for weights and the final CF.
const CF_DECIMALS: i32 = 4;

#[derive(Debug, Clone)]
pub struct DiagnosisRequest {
    pub requester_id: i64,
    pub symptom_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisOutcome {
    pub diagnosis_id: i64,
    pub disease_id: String,
    pub disease: DiseaseInfo,
    /// Combined CF of the winner, rounded to 4 decimals as persisted.
    pub cf: f64,
    pub percent: f64,
    pub label: String,
    /// Weights that produced `cf`, in retrieval order.
    pub weights: Vec<f64>,
    pub annotation: String,
    /// Symptoms actually used, after trimming and de-duplication.
    pub symptom_ids: Vec<String>,
    /// Other scored candidates, best first.
    pub runners_up: Vec<ScoredCandidate>,
}

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("Select at least one symptom.")]
    NoSymptomsSelected,

    #[error("No disease matches this symptom combination.")]
    NoCandidate,

    #[error("No MB/MD weights are configured for this symptom combination.")]
    NoWeight,

    #[error("Knowledge store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl From<DiagnosisError> for ApiError {
    fn from(err: DiagnosisError) -> Self {
        match err {
            DiagnosisError::Store(e) => ApiError::Internal(format!("{:#}", e)),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// Trim, drop blanks and keep the first occurrence of each id.
pub fn normalize_symptom_ids(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !out.iter().any(|s| s == id) {
            out.push(id.to_string());
        }
    }
    out
}

/// Human-readable record of how a CF was reached,
/// e.g. `CF: 0.7000, 0.4000 | High (82%)`.
pub fn format_annotation(weights: &[f64], cf: f64) -> String {
    let label = classify(cf);
    let weights = weights
        .iter()
        .map(|w| format!("{:.4}", w))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CF: {} | {} ({}%)", weights, label.text(), label.percent)
}

/// Run one diagnosis and persist it.
///
/// Reads are not isolated from concurrent admin edits; the persisted record
/// reflects whatever relations were visible while it ran.
pub async fn run_diagnosis(
    store: &dyn KnowledgeStore,
    request: &DiagnosisRequest,
) -> Result<DiagnosisOutcome, DiagnosisError> {
    let selected = normalize_symptom_ids(&request.symptom_ids);
    if selected.is_empty() {
        return Err(DiagnosisError::NoSymptomsSelected);
    }

    let disease_ids = store.get_candidate_diseases(&selected).await?;
    if disease_ids.is_empty() {
        debug!(symptoms = ?selected, "No candidate disease");
        return Err(DiagnosisError::NoCandidate);
    }

    let mut candidates = Vec::with_capacity(disease_ids.len());
    for disease_id in disease_ids {
        let weights = store
            .get_relations(&disease_id, &selected)
            .await?
            .into_iter()
            .map(|r| round_to(r.weight, CF_DECIMALS))
            .collect();
        candidates.push(Candidate::new(disease_id, weights));
    }

    let ranking = rank_candidates(candidates).map_err(|e| match e {
        RankError::NoEligibleCandidate => DiagnosisError::NoWeight,
    })?;
    let best = ranking.best;

    let cf = round_to(best.cf, CF_DECIMALS);
    let label = classify(cf);
    let annotation = format_annotation(&best.weights, cf);
    let disease = store.get_disease_info(&best.disease_id).await?;

    let diagnosis_id = store
        .save_diagnosis_with_symptoms(request.requester_id, &best.disease_id, cf, &annotation, &selected)
        .await?;

    info!(
        diagnosis_id,
        requester_id = request.requester_id,
        disease_id = %best.disease_id,
        cf,
        candidates = ranking.runners_up.len() + 1,
        "Diagnosis completed"
    );

    Ok(DiagnosisOutcome {
        diagnosis_id,
        disease_id: best.disease_id,
        disease,
        cf,
        percent: label.percent,
        label: label.text(),
        weights: best.weights,
        annotation,
        symptom_ids: selected,
        runners_up: ranking.runners_up,
    })
}
