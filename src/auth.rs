//! Authentication oracle boundary.
//!
//! A boolean credential check and a session flag, shared with the host
//! shell. Credentials are the demo pair; a production deployment swaps this
//! for a real identity backend without touching the data core.

use std::sync::RwLock;

use serde::Serialize;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub display_name: String,
}

/// The signed-in state. `None` while locked out.
#[derive(Debug, Default)]
pub struct AuthSession {
    current: RwLock<Option<User>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check credentials and open a session. The username comparison is
    /// case-insensitive; the password is exact.
    pub fn login(&self, username: &str, password: &str) -> bool {
        if username.eq_ignore_ascii_case(DEMO_USERNAME) && password == DEMO_PASSWORD {
            *self.current.write().expect("session lock poisoned") = Some(User {
                username: DEMO_USERNAME.into(),
                display_name: "Demo User".into(),
            });
            tracing::info!(user = DEMO_USERNAME, "session opened");
            true
        } else {
            tracing::warn!("rejected credentials");
            false
        }
    }

    pub fn logout(&self) {
        *self.current.write().expect("session lock poisoned") = None;
        tracing::info!("session closed");
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().expect("session lock poisoned").clone()
    }
}
