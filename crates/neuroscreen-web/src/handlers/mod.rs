//! HTTP handlers for all web routes.

pub mod home;
pub mod auth;
pub mod dashboard;
pub mod diagnosis;
pub mod history;
pub mod admin;

use serde::Serialize;

/// Body of a successful admin API mutation.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), id: None }
    }

    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self { success: true, message: message.into(), id: Some(id) }
    }
}
