//! Shared application state for the web server.

use crate::templates::Templates;
use neuroscreen_config::Config;
use neuroscreen_db::Database;
use neuroscreen_ranker::{KnowledgeStore, PgKnowledgeStore};
use neuroscreen_security::SessionStore;
use std::sync::Arc;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub db: Arc<Database>,
    /// Source of relations and sink for diagnosis records.
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub sessions: SessionStore,
    pub templates: Templates,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> anyhow::Result<Self> {
        let db = Arc::new(db);
        let ttl = session_ttl(config.session.ttl_minutes)?;
        Ok(Self {
            knowledge: Arc::new(PgKnowledgeStore::new(db.clone())),
            db,
            sessions: SessionStore::new(ttl),
            templates: Templates::new()?,
            config,
        })
    }
}

/// Session lifetime from the configured minutes, rejecting values chrono cannot represent.
pub fn session_ttl(minutes: u64) -> anyhow::Result<chrono::TimeDelta> {
    i64::try_from(minutes)
        .ok()
        .and_then(chrono::TimeDelta::try_minutes)
        .filter(|ttl| *ttl > chrono::TimeDelta::zero())
        .ok_or_else(|| anyhow::anyhow!("session.ttl_minutes out of range: {}", minutes))
}

pub type SharedState = Arc<AppState>;
