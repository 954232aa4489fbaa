//! NeuroScreen Database Layer
//!
//! PostgreSQL storage for the screening knowledge base (diseases, symptoms,
//! MB/MD relations), user accounts and diagnosis history.
//!
//! All statements are parameterized; no value is ever interpolated into SQL.
//!
//! # Example
//!
//! ```rust,no_run
//! use neuroscreen_db::{Database, SymptomRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/neuroscreen", 5, 1, std::time::Duration::from_secs(5)).await?;
//!     db.initialize().await?;
//!
//!     let symptoms = SymptomRepository::new(Arc::new(db));
//!     for s in symptoms.list("").await? {
//!         println!("{} {}", s.id, s.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod schema;
pub mod symptoms;
pub mod diseases;
pub mod relations;
pub mod users;
pub mod diagnoses;

pub use database::{Database, DatabaseStats};
pub use error::{DbError, Result};
pub use symptoms::SymptomRepository;
pub use diseases::DiseaseRepository;
pub use relations::RelationRepository;
pub use users::{UserRepository, UserCredentials};
pub use diagnoses::DiagnosisRepository;

/// Build an ILIKE pattern matching `search` anywhere, with LIKE wildcards escaped.
pub(crate) fn like_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern(" head "), "%head%");
        assert_eq!(like_pattern("50%_"), "%50\\%\\_%");
    }
}
