//! Disease repository.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::like_pattern;
use neuroscreen_common::Disease;
use std::sync::Arc;

/// Repository for disease reference data.
#[derive(Clone)]
pub struct DiseaseRepository {
    db: Arc<Database>,
}

impl DiseaseRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List diseases whose name matches `search`, ordered by code.
    pub async fn list(&self, search: &str) -> Result<Vec<Disease>> {
        let rows = sqlx::query_as::<_, Disease>(
            r#"
            SELECT id, name, description, recommended_action
            FROM diseases
            WHERE name ILIKE $1 OR id ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(search))
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Disease>> {
        let row = sqlx::query_as::<_, Disease>(
            "SELECT id, name, description, recommended_action FROM diseases WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(row)
    }

    pub async fn insert(&self, disease: &Disease) -> Result<()> {
        validate(disease)?;
        sqlx::query(
            r#"
            INSERT INTO diseases (id, name, description, recommended_action)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(disease.id.trim())
        .bind(disease.name.trim())
        .bind(&disease.description)
        .bind(&disease.recommended_action)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Update a disease, possibly renaming its code. Relations follow via ON UPDATE CASCADE.
    pub async fn update(&self, id: &str, disease: &Disease) -> Result<()> {
        validate(disease)?;
        let result = sqlx::query(
            r#"
            UPDATE diseases
            SET id = $1, name = $2, description = $3, recommended_action = $4
            WHERE id = $5
            "#,
        )
        .bind(disease.id.trim())
        .bind(disease.name.trim())
        .bind(&disease.description)
        .bind(&disease.recommended_action)
        .bind(id)
        .execute(self.db.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("disease {}", id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM diseases WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("disease {}", id)));
        }
        Ok(())
    }
}

fn validate(disease: &Disease) -> Result<()> {
    if disease.id.trim().is_empty() || disease.name.trim().is_empty() {
        return Err(DbError::Validation("Disease code and name are required.".into()));
    }
    Ok(())
}
