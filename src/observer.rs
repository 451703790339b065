//! Session observer trait

use crate::model::Role;

/// Observer trait for external observability.
///
/// Storage failures are fire-and-forget by design; `on_persistence_error` is
/// the diagnostic channel that keeps them from disappearing entirely.
pub trait SessionObserver: Send + Sync + 'static {
    fn on_bootstrap_completed(&self, authenticated: bool);
    fn on_login(&self, user_id: &str, role: Role);
    fn on_logout(&self);
    fn on_session_cleared(&self, reason: &str);
    fn on_role_changed(&self, role: Role);
    fn on_draft_persisted(&self);
    fn on_draft_reset(&self);
    fn on_persistence_error(&self, key: &str, error: &str);
}

/// No-op observer
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {
    fn on_bootstrap_completed(&self, _authenticated: bool) {}
    fn on_login(&self, _user_id: &str, _role: Role) {}
    fn on_logout(&self) {}
    fn on_session_cleared(&self, _reason: &str) {}
    fn on_role_changed(&self, _role: Role) {}
    fn on_draft_persisted(&self) {}
    fn on_draft_reset(&self) {}
    fn on_persistence_error(&self, _key: &str, _error: &str) {}
}

/// Tracing-based observer
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_bootstrap_completed(&self, authenticated: bool) {
        tracing::info!(authenticated, "Session bootstrap completed");
    }

    fn on_login(&self, user_id: &str, role: Role) {
        tracing::info!(user_id = %user_id, role = %role, "User logged in");
    }

    fn on_logout(&self) {
        tracing::info!("User logged out");
    }

    fn on_session_cleared(&self, reason: &str) {
        tracing::warn!(reason = %reason, "Session cleared");
    }

    fn on_role_changed(&self, role: Role) {
        tracing::info!(role = %role, "Active role changed");
    }

    fn on_draft_persisted(&self) {
        tracing::debug!("Listing draft persisted");
    }

    fn on_draft_reset(&self) {
        tracing::info!("Listing draft reset");
    }

    fn on_persistence_error(&self, key: &str, error: &str) {
        tracing::warn!(key = %key, error = %error, "Persistence failed; in-memory state remains authoritative");
    }
}
