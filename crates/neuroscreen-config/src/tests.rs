use super::*;
use std::collections::HashMap;

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.session.cookie_name, "neuroscreen_session");
    assert_eq!(config.database.max_connections, 10);
    assert!(config.admin.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_toml_str(
        r#"
        [server]
        port = 8080

        [admin]
        username = "admin"
        password = "admin123"
        "#,
    )
    .unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
    let admin = config.admin.as_ref().unwrap();
    assert_eq!(admin.name, "Administrator");
    assert_eq!(config.bind_addr(), "127.0.0.1:8080");
}

#[test]
fn test_env_overrides_database_url_and_port() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgres://fallback/db"),
        ("NEUROSCREEN_DATABASE_URL", "postgres://primary/db"),
        ("NEUROSCREEN_PORT", "4000"),
    ]);
    let mut config = Config::default();
    config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(config.database.url, "postgres://primary/db");
    assert_eq!(config.server.port, 4000);
}

#[test]
fn test_bad_port_override_is_rejected() {
    let mut config = Config::default();
    let result = config.apply_env(|k| (k == "NEUROSCREEN_PORT").then(|| "eighty".to_string()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_inverted_pool_bounds() {
    let mut config = Config::default();
    config.database.min_connections = 20;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_short_bootstrap_password() {
    let config = Config::from_toml_str(
        r#"
        [admin]
        username = "admin"
        password = "123"
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_bounds_session_ttl() {
    let mut config = Config::default();
    config.session.ttl_minutes = MAX_SESSION_TTL_MINUTES;
    assert!(config.validate().is_ok());

    config.session.ttl_minutes = MAX_SESSION_TTL_MINUTES + 1;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    config.session.ttl_minutes = 1 << 62;
    assert!(config.validate().is_err());

    config.session.ttl_minutes = 0;
    assert!(config.validate().is_err());
}
