//! NeuroScreen Web Server
//!
//! Run with: cargo run -p neuroscreen-web --bin neuroscreen

use std::sync::Arc;
use std::time::Duration;
use neuroscreen_config::Config;
use neuroscreen_db::{Database, UserRepository};
use neuroscreen_security::hash_password;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often expired sessions are swept.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting NeuroScreen...");

    let db = Database::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    db.initialize().await?;

    if let Some(admin) = &config.admin {
        let users = UserRepository::new(Arc::new(db.clone()));
        let hash = hash_password(&admin.password)?;
        if !users.ensure_admin(&admin.name, &admin.username, &hash).await? {
            info!("Administrator account present, bootstrap skipped");
        }
    } else if UserRepository::new(Arc::new(db.clone())).count_admins().await? == 0 {
        warn!("No administrator account exists; set [admin] in the config to create one");
    }

    let addr = config.bind_addr();
    let state = Arc::new(neuroscreen_web::state::AppState::new(db, config)?);

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sweeper.sessions.purge_expired().await;
            if purged > 0 {
                info!(purged, "Expired sessions removed");
            }
        }
    });

    let app = neuroscreen_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
