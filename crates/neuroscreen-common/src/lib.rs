//! neuroscreen-common - Shared entities and error types used across all NeuroScreen crates.

pub mod error;
pub mod entities;

// Re-export commonly used types
pub use entities::{
    Disease, DiseaseInfo, Symptom, Relation, RelationView, RelationWeight, NewRelation,
    Role, User, DiagnosisRecord, DiagnosisSummary, DiagnosisSymptom,
};
pub use error::ApiError;
