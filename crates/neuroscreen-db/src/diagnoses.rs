//! Diagnosis history repository.
//!
//! Diagnoses are append-only: rows are never updated after insert.

use crate::database::Database;
use crate::error::Result;
use neuroscreen_common::{DiagnosisRecord, DiagnosisSummary, DiagnosisSymptom};
use sqlx::PgConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct DiagnosisRepository {
    db: Arc<Database>,
}

impl DiagnosisRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist a diagnosis and return its id.
    pub async fn insert(&self, user_id: i64, disease_id: &str, cf_value: f64, annotation: &str) -> Result<i64> {
        let mut conn = self.db.pool().acquire().await?;
        insert_diagnosis(&mut *conn, user_id, disease_id, cf_value, annotation).await
    }

    /// Record the symptoms selected for a diagnosis, in a single transaction.
    pub async fn insert_symptoms(&self, diagnosis_id: i64, symptom_ids: &[String]) -> Result<()> {
        if symptom_ids.is_empty() {
            return Ok(());
        }
        let mut tx = self.db.pool().begin().await?;
        insert_symptom_rows(&mut *tx, diagnosis_id, symptom_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Persist a diagnosis together with its selected symptoms.
    /// Either every row is written or none is.
    pub async fn insert_with_symptoms(
        &self,
        user_id: i64,
        disease_id: &str,
        cf_value: f64,
        annotation: &str,
        symptom_ids: &[String],
    ) -> Result<i64> {
        let mut tx = self.db.pool().begin().await?;
        let id = insert_diagnosis(&mut *tx, user_id, disease_id, cf_value, annotation).await?;
        insert_symptom_rows(&mut *tx, id, symptom_ids).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// A user's diagnoses, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<DiagnosisSummary>> {
        let rows = sqlx::query_as::<_, DiagnosisSummary>(
            r#"
            SELECT dg.id, dg.created_at, dg.disease_id, d.name AS disease_name, dg.cf_value
            FROM diagnoses dg
            LEFT JOIN diseases d ON d.id = dg.disease_id
            WHERE dg.user_id = $1
            ORDER BY dg.created_at DESC, dg.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    /// Fetch a diagnosis only if it belongs to `user_id`.
    pub async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<DiagnosisRecord>> {
        let row = sqlx::query_as::<_, DiagnosisRecord>(
            r#"
            SELECT id, user_id, disease_id, cf_value, annotation, created_at
            FROM diagnoses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(row)
    }

    /// Symptoms selected for a diagnosis, in selection order.
    pub async fn symptoms_for(&self, diagnosis_id: i64) -> Result<Vec<DiagnosisSymptom>> {
        let rows = sqlx::query_as::<_, DiagnosisSymptom>(
            r#"
            SELECT ds.symptom_id, COALESCE(s.name, ds.symptom_id) AS symptom_name
            FROM diagnosis_symptoms ds
            LEFT JOIN symptoms s ON s.id = ds.symptom_id
            WHERE ds.diagnosis_id = $1
            ORDER BY ds.id
            "#,
        )
        .bind(diagnosis_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }
}

async fn insert_diagnosis(
    conn: &mut PgConnection,
    user_id: i64,
    disease_id: &str,
    cf_value: f64,
    annotation: &str,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO diagnoses (user_id, disease_id, cf_value, annotation)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(disease_id)
    .bind(cf_value)
    .bind(annotation)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

async fn insert_symptom_rows(conn: &mut PgConnection, diagnosis_id: i64, symptom_ids: &[String]) -> Result<()> {
    for symptom_id in symptom_ids {
        sqlx::query("INSERT INTO diagnosis_symptoms (diagnosis_id, symptom_id) VALUES ($1, $2)")
            .bind(diagnosis_id)
            .bind(symptom_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
