//! neuroscreen-security - password hashing and login sessions.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password, SecurityError, MIN_PASSWORD_LEN};
pub use session::{SessionStore, SessionUser};
