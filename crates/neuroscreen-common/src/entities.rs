/// Core entity types mirroring the knowledge base schema.
/// These are Rust representations of the PostgreSQL tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Symptom
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Symptom {
    pub id: String,   // e.g. G01
    pub name: String,
}

// ---------------------------------------------------------------------------
// Disease
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Disease {
    pub id: String,   // e.g. P01
    pub name: String,
    pub description: String,
    pub recommended_action: String,
}

/// Display information for a diagnosed disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
    pub description: String,
    pub recommended_action: String,
}

impl DiseaseInfo {
    /// Placeholder shown when the disease record no longer exists.
    pub fn placeholder(disease_id: &str) -> Self {
        Self {
            name: disease_id.to_string(),
            description: "-".to_string(),
            recommended_action: "-".to_string(),
        }
    }
}

impl From<Disease> for DiseaseInfo {
    fn from(d: Disease) -> Self {
        Self { name: d.name, description: d.description, recommended_action: d.recommended_action }
    }
}

// ---------------------------------------------------------------------------
// Relation (disease ↔ symptom with MB / MD)
// ---------------------------------------------------------------------------

/// A stored relation. `weight` is always `mb - md` as of the last write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Relation {
    pub id: i64,
    pub disease_id: String,
    pub symptom_id: String,
    pub mb: f64,
    pub md: f64,
    pub weight: f64,
}

/// Relation joined with disease and symptom names, for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct RelationView {
    pub id: i64,
    pub disease_id: String,
    pub disease_name: String,
    pub symptom_id: String,
    pub symptom_name: String,
    pub mb: f64,
    pub md: f64,
    pub weight: f64,
}

/// Administrator input for creating or editing a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRelation {
    pub disease_id: String,
    pub symptom_id: String,
    pub mb: f64,
    pub md: f64,
}

impl NewRelation {
    /// Certainty weight derived from the measures: MB − MD.
    pub fn weight(&self) -> f64 {
        self.mb - self.md
    }

    /// Check identifiers are present and both measures lie in [0, 1].
    pub fn validate(&self) -> Result<(), String> {
        if self.disease_id.trim().is_empty() || self.symptom_id.trim().is_empty() {
            return Err("Disease and symptom are required.".to_string());
        }
        for (label, value) in [("MB", self.mb), ("MD", self.md)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1, got {}", label, value));
            }
        }
        Ok(())
    }
}

/// The slice of a relation the certainty engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct RelationWeight {
    pub symptom_id: String,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Users & roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Serialize to the string stored in the DB.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User  => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user"  => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other   => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// A registered account, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Diagnosis history
// ---------------------------------------------------------------------------

/// A persisted diagnosis run. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct DiagnosisRecord {
    pub id: i64,
    pub user_id: i64,
    pub disease_id: String,
    pub cf_value: f64,
    pub annotation: String,
    pub created_at: DateTime<Utc>,
}

/// Row of a requester's history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct DiagnosisSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub disease_id: String,
    pub disease_name: Option<String>,
    pub cf_value: f64,
}

/// A symptom selected for a given diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct DiagnosisSymptom {
    pub symptom_id: String,
    pub symptom_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_weight_is_mb_minus_md() {
        let rel = NewRelation { disease_id: "P01".into(), symptom_id: "G01".into(), mb: 0.8, md: 0.1 };
        assert_eq!(rel.weight(), 0.8 - 0.1);
        assert!(rel.validate().is_ok());
    }

    #[test]
    fn test_relation_rejects_out_of_range_measures() {
        let rel = NewRelation { disease_id: "P01".into(), symptom_id: "G01".into(), mb: 1.2, md: 0.0 };
        assert!(rel.validate().is_err());
        let rel = NewRelation { disease_id: "P01".into(), symptom_id: "G01".into(), mb: 0.5, md: f64::NAN };
        assert!(rel.validate().is_err());
        let rel = NewRelation { disease_id: " ".into(), symptom_id: "G01".into(), mb: 0.5, md: 0.1 };
        assert!(rel.validate().is_err());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::User.as_str(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_disease_info_placeholder() {
        let info = DiseaseInfo::placeholder("P09");
        assert_eq!(info.name, "P09");
        assert_eq!(info.description, "-");
        assert_eq!(info.recommended_action, "-");
    }
}
