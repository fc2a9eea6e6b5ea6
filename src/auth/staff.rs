// src/auth/staff.rs
use crate::auth::sessions::create_session;
use crate::auth::token::{hash_token, hashes_equal};
use crate::errors::ServerError;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct StaffAuthConfig {
    /// Shared staff secret. `None` means nobody can log in.
    pub admin_token: Option<String>,
    pub session_ttl_secs: i64,
}

/// Exchanges the staff secret for a session.
pub struct StaffAuth {
    cfg: StaffAuthConfig,
}

impl StaffAuth {
    pub fn new(cfg: StaffAuthConfig) -> Self {
        Self { cfg }
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.cfg.session_ttl_secs
    }

    /// Checks `submitted` against the configured secret and opens a session.
    pub fn login(&self, conn: &Connection, submitted: &str, now: i64) -> Result<String, ServerError> {
        let Some(expected) = self.cfg.admin_token.as_deref() else {
            return Err(ServerError::Unauthorized("admin console is disabled".into()));
        };

        let submitted = submitted.trim();
        if submitted.is_empty() || !hashes_equal(&hash_token(submitted), &hash_token(expected)) {
            tracing::warn!("rejected staff login");
            return Err(ServerError::Unauthorized("invalid staff token".into()));
        }

        let token = create_session(conn, now, self.cfg.session_ttl_secs)?;
        tracing::info!("staff session opened");
        Ok(token)
    }
}
