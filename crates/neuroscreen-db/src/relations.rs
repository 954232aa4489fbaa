//! Relation repository.
//!
//! Every write recomputes `weight = mb - md`; the table has a CHECK constraint
//! enforcing the same, so a stale weight can never be stored.

use crate::database::Database;
use crate::error::{DbError, Result};
use neuroscreen_common::{NewRelation, Relation, RelationView, RelationWeight};
use std::sync::Arc;

/// Repository for disease ↔ symptom relations.
#[derive(Clone)]
pub struct RelationRepository {
    db: Arc<Database>,
}

impl RelationRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All relations joined with disease and symptom names, in insertion order.
    pub async fn list(&self) -> Result<Vec<RelationView>> {
        let rows = sqlx::query_as::<_, RelationView>(
            r#"
            SELECT r.id,
                   r.disease_id, d.name AS disease_name,
                   r.symptom_id, s.name AS symptom_name,
                   r.mb, r.md, r.weight
            FROM relations r
            JOIN diseases d ON d.id = r.disease_id
            JOIN symptoms s ON s.id = r.symptom_id
            ORDER BY r.id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Relation>> {
        let row = sqlx::query_as::<_, Relation>(
            "SELECT id, disease_id, symptom_id, mb, md, weight FROM relations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(row)
    }

    /// Insert a relation and return its id.
    pub async fn insert(&self, rel: &NewRelation) -> Result<i64> {
        rel.validate().map_err(DbError::Validation)?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO relations (disease_id, symptom_id, mb, md, weight)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&rel.disease_id)
        .bind(&rel.symptom_id)
        .bind(rel.mb)
        .bind(rel.md)
        .bind(rel.weight())
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    /// Replace a relation's pair and measures; weight is recomputed.
    pub async fn update(&self, id: i64, rel: &NewRelation) -> Result<()> {
        rel.validate().map_err(DbError::Validation)?;
        let result = sqlx::query(
            r#"
            UPDATE relations
            SET disease_id = $1, symptom_id = $2, mb = $3, md = $4, weight = $5
            WHERE id = $6
            "#,
        )
        .bind(&rel.disease_id)
        .bind(&rel.symptom_id)
        .bind(rel.mb)
        .bind(rel.md)
        .bind(rel.weight())
        .bind(id)
        .execute(self.db.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("relation {}", id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM relations WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("relation {}", id)));
        }
        Ok(())
    }

    /// Distinct diseases related to any of `symptom_ids`,
    /// ordered by their first matching relation.
    pub async fn candidate_diseases(&self, symptom_ids: &[String]) -> Result<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT disease_id
            FROM relations
            WHERE symptom_id = ANY($1)
            GROUP BY disease_id
            ORDER BY MIN(id)
            "#,
        )
        .bind(symptom_ids)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    /// Weights of `disease_id` for the given symptoms, in relation insertion order.
    pub async fn weights_for(&self, disease_id: &str, symptom_ids: &[String]) -> Result<Vec<RelationWeight>> {
        let rows = sqlx::query_as::<_, RelationWeight>(
            r#"
            SELECT symptom_id, weight
            FROM relations
            WHERE disease_id = $1 AND symptom_id = ANY($2)
            ORDER BY id
            "#,
        )
        .bind(disease_id)
        .bind(symptom_ids)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }
}
