//! Symptom repository.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::like_pattern;
use neuroscreen_common::Symptom;
use std::sync::Arc;

/// Repository for symptom reference data.
#[derive(Clone)]
pub struct SymptomRepository {
    db: Arc<Database>,
}

impl SymptomRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List symptoms whose name matches `search`, ordered by code.
    pub async fn list(&self, search: &str) -> Result<Vec<Symptom>> {
        let rows = sqlx::query_as::<_, Symptom>(
            "SELECT id, name FROM symptoms WHERE name ILIKE $1 OR id ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(search))
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Symptom>> {
        let row = sqlx::query_as::<_, Symptom>("SELECT id, name FROM symptoms WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row)
    }

    pub async fn insert(&self, symptom: &Symptom) -> Result<()> {
        validate(symptom)?;
        sqlx::query("INSERT INTO symptoms (id, name) VALUES ($1, $2)")
            .bind(symptom.id.trim())
            .bind(symptom.name.trim())
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Update a symptom, possibly renaming its code. Relations follow via ON UPDATE CASCADE.
    pub async fn update(&self, id: &str, symptom: &Symptom) -> Result<()> {
        validate(symptom)?;
        let result = sqlx::query("UPDATE symptoms SET id = $1, name = $2 WHERE id = $3")
            .bind(symptom.id.trim())
            .bind(symptom.name.trim())
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("symptom {}", id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM symptoms WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("symptom {}", id)));
        }
        Ok(())
    }
}

fn validate(symptom: &Symptom) -> Result<()> {
    if symptom.id.trim().is_empty() || symptom.name.trim().is_empty() {
        return Err(DbError::Validation("Symptom code and name are required.".into()));
    }
    Ok(())
}
