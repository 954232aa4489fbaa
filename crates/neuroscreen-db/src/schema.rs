//! Table definitions for the PostgreSQL store.
//!
//! Statements are idempotent and run in order by `Database::initialize`.

pub const TABLE_USERS: &str = "users";
pub const TABLE_SYMPTOMS: &str = "symptoms";
pub const TABLE_DISEASES: &str = "diseases";
pub const TABLE_RELATIONS: &str = "relations";
pub const TABLE_DIAGNOSES: &str = "diagnoses";
pub const TABLE_DIAGNOSIS_SYMPTOMS: &str = "diagnosis_symptoms";

pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            BIGSERIAL PRIMARY KEY,
        name          TEXT NOT NULL,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL CHECK (role IN ('user', 'admin')),
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS symptoms (
        id   TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS diseases (
        id                 TEXT PRIMARY KEY,
        name               TEXT NOT NULL,
        description        TEXT NOT NULL DEFAULT '',
        recommended_action TEXT NOT NULL DEFAULT ''
    )
    "#,
    // weight must equal mb - md on every write
    r#"
    CREATE TABLE IF NOT EXISTS relations (
        id         BIGSERIAL PRIMARY KEY,
        disease_id TEXT NOT NULL REFERENCES diseases(id) ON UPDATE CASCADE ON DELETE CASCADE,
        symptom_id TEXT NOT NULL REFERENCES symptoms(id) ON UPDATE CASCADE ON DELETE CASCADE,
        mb         DOUBLE PRECISION NOT NULL CHECK (mb >= 0 AND mb <= 1),
        md         DOUBLE PRECISION NOT NULL CHECK (md >= 0 AND md <= 1),
        weight     DOUBLE PRECISION NOT NULL CHECK (weight = mb - md),
        UNIQUE (disease_id, symptom_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_relations_symptom ON relations (symptom_id)",
    r#"
    CREATE TABLE IF NOT EXISTS diagnoses (
        id         BIGSERIAL PRIMARY KEY,
        user_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        disease_id TEXT NOT NULL,
        cf_value   DOUBLE PRECISION NOT NULL,
        annotation TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_diagnoses_user ON diagnoses (user_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS diagnosis_symptoms (
        id           BIGSERIAL PRIMARY KEY,
        diagnosis_id BIGINT NOT NULL REFERENCES diagnoses(id) ON DELETE CASCADE,
        symptom_id   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_diagnosis_symptoms_diagnosis ON diagnosis_symptoms (diagnosis_id)",
];
