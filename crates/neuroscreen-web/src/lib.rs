//! neuroscreen-web - web application for NeuroScreen.
//! Provides:
//!   - Public landing, about, login and registration pages
//!   - Symptom checklist and certainty-factor diagnosis for users
//!   - Per-user diagnosis history
//!   - Administration of users, diseases, symptoms and MB/MD relations

pub mod router;
pub mod handlers;
pub mod state;
pub mod session;
pub mod templates;
