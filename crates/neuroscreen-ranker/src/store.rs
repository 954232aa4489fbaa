//! Knowledge-store abstraction for the diagnosis engine.
//!
//! Decouples the orchestration in [`crate::diagnosis`] from PostgreSQL so the
//! engine can be exercised against in-memory data.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neuroscreen_common::{DiseaseInfo, RelationWeight};
use neuroscreen_db::{Database, DiagnosisRepository, DiseaseRepository, RelationRepository};
use std::sync::{Arc, Mutex};

/// Everything a diagnosis run reads from and writes to.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Distinct diseases related to any selected symptom, ordered by their
    /// earliest matching relation.
    async fn get_candidate_diseases(&self, symptom_ids: &[String]) -> Result<Vec<String>>;

    /// Weights for one disease restricted to the selected symptoms, in
    /// relation insertion order.
    async fn get_relations(&self, disease_id: &str, symptom_ids: &[String]) -> Result<Vec<RelationWeight>>;

    /// Display info, or [`DiseaseInfo::placeholder`] if the disease is gone.
    async fn get_disease_info(&self, disease_id: &str) -> Result<DiseaseInfo>;

    async fn save_diagnosis(&self, requester_id: i64, disease_id: &str, cf_value: f64, annotation: &str) -> Result<i64>;

    async fn save_selected_symptoms(&self, diagnosis_id: i64, symptom_ids: &[String]) -> Result<()>;

    /// Persist a diagnosis and its selected symptoms as one unit: on error
    /// nothing is stored.
    async fn save_diagnosis_with_symptoms(
        &self,
        requester_id: i64,
        disease_id: &str,
        cf_value: f64,
        annotation: &str,
        symptom_ids: &[String],
    ) -> Result<i64>;
}

// ── PostgreSQL adapter ──────────────────────────────────────────────────────

/// [`KnowledgeStore`] backed by the `neuroscreen-db` repositories.
#[derive(Clone)]
pub struct PgKnowledgeStore {
    relations: RelationRepository,
    diseases: DiseaseRepository,
    diagnoses: DiagnosisRepository,
}

impl PgKnowledgeStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            relations: RelationRepository::new(db.clone()),
            diseases: DiseaseRepository::new(db.clone()),
            diagnoses: DiagnosisRepository::new(db),
        }
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn get_candidate_diseases(&self, symptom_ids: &[String]) -> Result<Vec<String>> {
        self.relations
            .candidate_diseases(symptom_ids)
            .await
            .context("Failed to load candidate diseases")
    }

    async fn get_relations(&self, disease_id: &str, symptom_ids: &[String]) -> Result<Vec<RelationWeight>> {
        self.relations
            .weights_for(disease_id, symptom_ids)
            .await
            .with_context(|| format!("Failed to load relation weights for {}", disease_id))
    }

    async fn get_disease_info(&self, disease_id: &str) -> Result<DiseaseInfo> {
        let disease = self
            .diseases
            .get(disease_id)
            .await
            .with_context(|| format!("Failed to load disease {}", disease_id))?;
        Ok(disease
            .map(DiseaseInfo::from)
            .unwrap_or_else(|| DiseaseInfo::placeholder(disease_id)))
    }

    async fn save_diagnosis(&self, requester_id: i64, disease_id: &str, cf_value: f64, annotation: &str) -> Result<i64> {
        self.diagnoses
            .insert(requester_id, disease_id, cf_value, annotation)
            .await
            .context("Failed to save diagnosis")
    }

    async fn save_selected_symptoms(&self, diagnosis_id: i64, symptom_ids: &[String]) -> Result<()> {
        self.diagnoses
            .insert_symptoms(diagnosis_id, symptom_ids)
            .await
            .context("Failed to save selected symptoms")
    }

    async fn save_diagnosis_with_symptoms(
        &self,
        requester_id: i64,
        disease_id: &str,
        cf_value: f64,
        annotation: &str,
        symptom_ids: &[String],
    ) -> Result<i64> {
        self.diagnoses
            .insert_with_symptoms(requester_id, disease_id, cf_value, annotation, symptom_ids)
            .await
            .context("Failed to save diagnosis")
    }
}

// ── In-memory implementation for testing ────────────────────────────────────

/// A diagnosis captured by [`MockKnowledgeStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDiagnosis {
    pub id: i64,
    pub requester_id: i64,
    pub disease_id: String,
    pub cf_value: f64,
    pub annotation: String,
    pub symptom_ids: Vec<String>,
}

/// In-memory store. Relations keep insertion order, which doubles as their id order.
#[derive(Default)]
pub struct MockKnowledgeStore {
    diseases: Vec<(String, DiseaseInfo)>,
    relations: Vec<(String, String, f64)>,
    saved: Mutex<Vec<SavedDiagnosis>>,
    fail_symptom_writes: bool,
}

impl MockKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disease(mut self, id: &str, name: &str) -> Self {
        self.diseases.push((
            id.to_string(),
            DiseaseInfo {
                name: name.to_string(),
                description: format!("About {}", name),
                recommended_action: "Consult a neurologist".to_string(),
            },
        ));
        self
    }

    /// Add a relation `disease ← symptom` with the given weight (MB − MD).
    pub fn with_relation(mut self, disease_id: &str, symptom_id: &str, weight: f64) -> Self {
        self.relations.push((disease_id.to_string(), symptom_id.to_string(), weight));
        self
    }

    /// Make every selected-symptom write fail, as a broken join table would.
    pub fn with_failing_symptom_writes(mut self) -> Self {
        self.fail_symptom_writes = true;
        self
    }

    /// Diagnoses saved so far.
    pub fn saved(&self) -> Vec<SavedDiagnosis> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl KnowledgeStore for MockKnowledgeStore {
    async fn get_candidate_diseases(&self, symptom_ids: &[String]) -> Result<Vec<String>> {
        let mut out: Vec<String> = Vec::new();
        for (disease, symptom, _) in &self.relations {
            if symptom_ids.contains(symptom) && !out.contains(disease) {
                out.push(disease.clone());
            }
        }
        Ok(out)
    }

    async fn get_relations(&self, disease_id: &str, symptom_ids: &[String]) -> Result<Vec<RelationWeight>> {
        Ok(self
            .relations
            .iter()
            .filter(|(d, s, _)| d == disease_id && symptom_ids.contains(s))
            .map(|(_, s, w)| RelationWeight { symptom_id: s.clone(), weight: *w })
            .collect())
    }

    async fn get_disease_info(&self, disease_id: &str) -> Result<DiseaseInfo> {
        Ok(self
            .diseases
            .iter()
            .find(|(id, _)| id == disease_id)
            .map(|(_, info)| info.clone())
            .unwrap_or_else(|| DiseaseInfo::placeholder(disease_id)))
    }

    async fn save_diagnosis(&self, requester_id: i64, disease_id: &str, cf_value: f64, annotation: &str) -> Result<i64> {
        let mut saved = self.saved.lock().map_err(|_| anyhow::anyhow!("mock store poisoned"))?;
        let id = saved.len() as i64 + 1;
        saved.push(SavedDiagnosis {
            id,
            requester_id,
            disease_id: disease_id.to_string(),
            cf_value,
            annotation: annotation.to_string(),
            symptom_ids: Vec::new(),
        });
        Ok(id)
    }

    async fn save_selected_symptoms(&self, diagnosis_id: i64, symptom_ids: &[String]) -> Result<()> {
        if self.fail_symptom_writes {
            anyhow::bail!("selected symptoms rejected");
        }
        let mut saved = self.saved.lock().map_err(|_| anyhow::anyhow!("mock store poisoned"))?;
        let record = saved
            .iter_mut()
            .find(|d| d.id == diagnosis_id)
            .ok_or_else(|| anyhow::anyhow!("unknown diagnosis {}", diagnosis_id))?;
        record.symptom_ids.extend_from_slice(symptom_ids);
        Ok(())
    }

    async fn save_diagnosis_with_symptoms(
        &self,
        requester_id: i64,
        disease_id: &str,
        cf_value: f64,
        annotation: &str,
        symptom_ids: &[String],
    ) -> Result<i64> {
        let mut saved = self.saved.lock().map_err(|_| anyhow::anyhow!("mock store poisoned"))?;
        if self.fail_symptom_writes {
            anyhow::bail!("selected symptoms rejected");
        }
        let id = saved.len() as i64 + 1;
        saved.push(SavedDiagnosis {
            id,
            requester_id,
            disease_id: disease_id.to_string(),
            cf_value,
            annotation: annotation.to_string(),
            symptom_ids: symptom_ids.to_vec(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_mock_candidates_follow_relation_order() {
        let store = MockKnowledgeStore::new()
            .with_relation("P02", "G01", 0.3)
            .with_relation("P01", "G01", 0.5)
            .with_relation("P02", "G02", 0.4)
            .with_relation("P03", "G09", 0.9);

        let candidates = store.get_candidate_diseases(&ids(&["G01", "G02"])).await.unwrap();
        assert_eq!(candidates, ids(&["P02", "P01"]));

        let weights = store.get_relations("P02", &ids(&["G02", "G01"])).await.unwrap();
        let w: Vec<f64> = weights.iter().map(|r| r.weight).collect();
        assert_eq!(w, vec![0.3, 0.4]);
    }

    #[tokio::test]
    async fn test_mock_missing_disease_gives_placeholder() {
        let store = MockKnowledgeStore::new().with_disease("P01", "Migraine");
        assert_eq!(store.get_disease_info("P01").await.unwrap().name, "Migraine");
        assert_eq!(store.get_disease_info("P77").await.unwrap(), DiseaseInfo::placeholder("P77"));
    }

    #[tokio::test]
    async fn test_mock_records_saves() {
        let store = MockKnowledgeStore::new();
        let id = store.save_diagnosis(7, "P01", 0.5, "note").await.unwrap();
        store.save_selected_symptoms(id, &ids(&["G01"])).await.unwrap();
        assert!(store.save_selected_symptoms(99, &ids(&["G01"])).await.is_err());

        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].requester_id, 7);
        assert_eq!(saved[0].symptom_ids, ids(&["G01"]));
    }

    #[tokio::test]
    async fn test_mock_combined_save_is_all_or_nothing() {
        let store = MockKnowledgeStore::new();
        let id = store
            .save_diagnosis_with_symptoms(7, "P01", 0.5, "note", &ids(&["G01", "G02"]))
            .await
            .unwrap();
        assert_eq!(store.saved()[0].id, id);
        assert_eq!(store.saved()[0].symptom_ids, ids(&["G01", "G02"]));

        let broken = MockKnowledgeStore::new().with_failing_symptom_writes();
        assert!(broken.save_diagnosis_with_symptoms(7, "P01", 0.5, "note", &ids(&["G01"])).await.is_err());
        assert!(broken.saved().is_empty());
    }
}
