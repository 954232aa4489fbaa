//! User account repository.
//!
//! Only password hashes are stored; hashing happens in `neuroscreen-security`.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::like_pattern;
use neuroscreen_common::{Role, User};
use std::sync::Arc;
use tracing::info;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    username: String,
    role: String,
    password_hash: String,
}

impl UserRow {
    fn into_credentials(self) -> Result<UserCredentials> {
        let role = self.role.parse::<Role>().map_err(DbError::Validation)?;
        Ok(UserCredentials {
            user: User { id: self.id, name: self.name, username: self.username, role },
            password_hash: self.password_hash,
        })
    }
}

/// A user together with the stored password hash, for login checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Look up an account by username within a role.
    pub async fn find_by_username(&self, username: &str, role: Role) -> Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, role, password_hash
            FROM users
            WHERE username = $1 AND role = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(role.as_str())
        .fetch_optional(self.db.pool())
        .await?;
        row.map(UserRow::into_credentials).transpose()
    }

    pub async fn exists_username(&self, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(self.db.pool())
            .await?;
        Ok(exists)
    }

    /// Create an account and return its id.
    pub async fn create(&self, name: &str, username: &str, password_hash: &str, role: Role) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    /// List users whose name or username matches `search`, ordered by name.
    pub async fn list(&self, search: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, role, password_hash
            FROM users
            WHERE name ILIKE $1 OR username ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(like_pattern(search))
        .fetch_all(self.db.pool())
        .await?;
        rows.into_iter()
            .map(|r| r.into_credentials().map(|c| c.user))
            .collect()
    }

    /// Change a user's role. Demoting the last administrator is refused.
    /// Every admin row is locked before counting.
    pub async fn update_role(&self, id: i64, role: Role) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        let admins: Vec<i64> = sqlx::query_scalar("SELECT id FROM users WHERE role = 'admin' ORDER BY id FOR UPDATE")
            .fetch_all(&mut *tx)
            .await?;

        let current: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = current.ok_or_else(|| DbError::NotFound(format!("user {}", id)))?;

        if current == Role::Admin.as_str() && role == Role::User && admins.len() <= 1 {
            return Err(DbError::Guard("At least one administrator is required.".into()));
        }

        sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete a regular user. Administrator accounts cannot be deleted.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        match role.as_deref() {
            None => return Err(DbError::NotFound(format!("user {}", id))),
            Some("admin") => return Err(DbError::Guard("Administrator accounts cannot be deleted.".into())),
            Some(_) => {}
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role <> 'admin'")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::Guard("Administrator accounts cannot be deleted.".into()));
        }
        tx.commit().await?;
        Ok(())
    }

    /// Replace an administrator's password hash. Returns the number of rows updated.
    pub async fn set_admin_password(&self, username: &str, password_hash: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE username = $2 AND role = 'admin'")
            .bind(password_hash)
            .bind(username)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_admins(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n as u64)
    }

    /// Create the given administrator if no administrator exists yet.
    /// Returns true when an account was created.
    pub async fn ensure_admin(&self, name: &str, username: &str, password_hash: &str) -> Result<bool> {
        if self.count_admins().await? > 0 {
            return Ok(false);
        }
        self.create(name, username, password_hash, Role::Admin).await?;
        info!(username, "Bootstrap administrator created");
        Ok(true)
    }
}
