//! Reset an administrator's password.
//!
//! Usage: set-admin-password <username> <new-password>

use std::sync::Arc;
use std::time::Duration;
use anyhow::{bail, Context};
use neuroscreen_config::Config;
use neuroscreen_db::{Database, UserRepository};
use neuroscreen_security::{hash_password, MIN_PASSWORD_LEN};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        bail!("usage: set-admin-password <username> <new-password>");
    };
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let db = Database::connect(
        &config.database.url,
        1,
        1,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await
    .context("Could not connect to the database")?;

    let hash = hash_password(&password)?;
    let updated = UserRepository::new(Arc::new(db))
        .set_admin_password(&username, &hash)
        .await?;
    if updated == 0 {
        bail!("no administrator named {:?}", username);
    }

    info!(username = %username, "Administrator password updated");
    Ok(())
}
