//! Authenticated session store: bootstrap, login, logout, role switching

use crate::gateway::{ApiGateway, GatewayError};
use crate::guards::RouteTarget;
use crate::model::{LoginRequest, RegisterRequest, ResetPasswordRequest, Role, User};
use crate::observer::SessionObserver;
use crate::storage::{keys, KeyValueStore, StorageError};
use std::sync::Arc;

/// OAuth client identity sent with password-grant logins
#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The gateway answered without a usable access token
    #[error("Login failed: no usable token in response")]
    MissingToken,
    /// Authenticated but the profile lookup failed; the credential is no
    /// longer trusted
    #[error("Profile fetch failed: {0}")]
    Profile(#[source] GatewayError),
    /// Transport-layer failure, propagated unchanged
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// In-memory session: credential and identity are only ever valid as a pair
#[derive(Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    active_role: Role,
}

/// Auth session store.
///
/// Constructed once per process and handed to consumers; holds the current
/// identity, credential, and active role, and keeps the gateway's default
/// bearer header in sync with every credential change.
pub struct AuthSession {
    gateway: Arc<dyn ApiGateway>,
    storage: Arc<dyn KeyValueStore>,
    observer: Arc<dyn SessionObserver>,
    client: ClientCredentials,
    state: std::sync::RwLock<SessionState>,
    // One-shot latch: concurrent first-time callers await the same in-flight
    // bootstrap instead of re-issuing network calls.
    bootstrap: tokio::sync::OnceCell<()>,
}

impl AuthSession {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        storage: Arc<dyn KeyValueStore>,
        observer: Arc<dyn SessionObserver>,
        client: ClientCredentials,
    ) -> Self {
        Self {
            gateway,
            storage,
            observer,
            client,
            state: std::sync::RwLock::new(SessionState::default()),
            bootstrap: tokio::sync::OnceCell::new(),
        }
    }

    /// Restore the session from persisted storage.
    ///
    /// Idempotent: runs at most once per process lifetime, even on failure.
    /// A stored token is installed optimistically, the cached profile is
    /// loaded if parseable, then the authoritative profile is re-fetched; a
    /// failed re-fetch invalidates trust in the credential and clears the
    /// whole session.
    pub async fn bootstrap(&self) {
        self.bootstrap
            .get_or_init(|| async {
                self.run_bootstrap().await;
            })
            .await;
    }

    async fn run_bootstrap(&self) {
        let stored_token = match self.storage.get(keys::TOKEN).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.observer.on_bootstrap_completed(false);
                return;
            }
            Err(e) => {
                self.report_persistence_error(keys::TOKEN, &e);
                self.observer.on_bootstrap_completed(false);
                return;
            }
        };

        self.gateway.set_auth_token(Some(stored_token.clone()));
        if let Ok(mut state) = self.state.write() {
            state.token = Some(stored_token);
        }

        // Optimistic: show the cached profile while the fresh one loads.
        // A corrupt cache entry is ignored, not fatal.
        if let Ok(Some(raw)) = self.storage.get(keys::USER).await {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    if let Ok(mut state) = self.state.write() {
                        state.user = Some(user);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring corrupt cached user profile");
                }
            }
        }

        if let Ok(Some(raw)) = self.storage.get(keys::ACTIVE_ROLE).await {
            if let Ok(mut state) = self.state.write() {
                state.active_role = Role::from_wire(&raw);
            }
        }

        match self.gateway.fetch_profile().await {
            Ok(user) => {
                self.persist_json(keys::USER, &user).await;
                if let Ok(mut state) = self.state.write() {
                    state.user = Some(user);
                }
                self.observer.on_bootstrap_completed(true);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed; clearing session");
                self.clear_session("profile refresh failed").await;
                self.observer.on_bootstrap_completed(false);
            }
        }
    }

    /// Whether bootstrap has completed (successfully or not)
    pub fn initialized(&self) -> bool {
        self.bootstrap.initialized()
    }

    /// Exchange credentials for a session.
    ///
    /// A response without an access token fails with
    /// [`AuthError::MissingToken`] and leaves the session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let request = LoginRequest::password_grant(
            email,
            password,
            &self.client.client_id,
            &self.client.client_secret,
        );
        let response = self.gateway.login(&request).await?;
        let token = response.access_token.ok_or(AuthError::MissingToken)?;

        self.gateway.set_auth_token(Some(token.clone()));
        let user = match self.gateway.fetch_profile().await {
            Ok(user) => user,
            Err(e) => {
                // Roll the credential back; the session never saw it.
                self.gateway.set_auth_token(None);
                return Err(AuthError::Profile(e));
            }
        };

        let role = Role::from_role_list(&user.roles);
        if let Ok(mut state) = self.state.write() {
            state.token = Some(token.clone());
            state.user = Some(user.clone());
            state.active_role = role;
        }

        self.persist_value(keys::TOKEN, &token).await;
        self.persist_json(keys::USER, &user).await;
        self.persist_value(keys::ACTIVE_ROLE, role.as_str()).await;

        self.observer.on_login(&user.id, role);
        Ok(user)
    }

    /// End the session: best-effort remote logout, then unconditional local
    /// teardown. Returns the route the caller should navigate to.
    pub async fn logout(&self) -> RouteTarget {
        let had_token = self
            .state
            .read()
            .map(|s| s.token.is_some())
            .unwrap_or(false);
        if had_token {
            if let Err(e) = self.gateway.logout().await {
                tracing::warn!(error = %e, "Remote logout failed; clearing local session anyway");
            }
        }
        self.clear_session("logout").await;
        self.observer.on_logout();
        RouteTarget::new("/login")
    }

    /// Overwrite the active role and persist it
    pub async fn set_active_role(&self, role: Role) {
        if let Ok(mut state) = self.state.write() {
            state.active_role = role;
        }
        self.persist_value(keys::ACTIVE_ROLE, role.as_str()).await;
        self.observer.on_role_changed(role);
    }

    /// Create an account; transport errors propagate unchanged
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, GatewayError> {
        self.gateway.register(request).await
    }

    /// Request a password reset; transport errors propagate unchanged
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), GatewayError> {
        self.gateway.reset_password(request).await
    }

    // === Accessors ===

    /// Token and identity must both be present
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|s| s.token.is_some() && s.user.is_some())
            .unwrap_or(false)
    }

    pub fn active_role(&self) -> Role {
        self.state.read().map(|s| s.active_role).unwrap_or_default()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().ok().and_then(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.token.clone())
    }

    // === Internals ===

    async fn clear_session(&self, reason: &str) {
        self.gateway.set_auth_token(None);
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::default();
        }
        for key in [keys::TOKEN, keys::USER, keys::ACTIVE_ROLE] {
            if let Err(e) = self.storage.remove(key).await {
                self.report_persistence_error(key, &e);
            }
        }
        self.observer.on_session_cleared(reason);
    }

    async fn persist_value(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value).await {
            self.report_persistence_error(key, &e);
        }
    }

    async fn persist_json<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.persist_value(key, &raw).await,
            Err(e) => {
                self.observer.on_persistence_error(key, &e.to_string());
            }
        }
    }

    fn report_persistence_error(&self, key: &str, error: &StorageError) {
        tracing::warn!(key = %key, error = %error, "Storage operation failed");
        self.observer.on_persistence_error(key, &error.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryGateway;
    use crate::observer::NoOpObserver;
    use crate::storage::InMemoryStore;
    use std::sync::atomic::Ordering;

    fn profile(roles: &[&str]) -> User {
        User {
            id: "u-1".into(),
            full_name: "Sam Player".into(),
            email: "sam@example.test".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    fn session(
        gateway: &Arc<InMemoryGateway>,
        storage: &Arc<InMemoryStore>,
    ) -> AuthSession {
        AuthSession::new(
            gateway.clone(),
            storage.clone(),
            Arc::new(NoOpObserver),
            ClientCredentials::new("client-id", "client-secret"),
        )
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_marks_initialized() {
        let gateway = Arc::new(InMemoryGateway::new());
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);

        auth.bootstrap().await;

        assert!(auth.initialized());
        assert!(!auth.is_authenticated());
        assert_eq!(gateway.profile_fetches.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_restores_persisted_session() {
        let gateway = Arc::new(InMemoryGateway::new().with_profile(profile(&["OWNER"])));
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "tok-1").await.unwrap();
        storage
            .set(keys::USER, &serde_json::to_string(&profile(&["OWNER"])).unwrap())
            .await
            .unwrap();
        storage.set(keys::ACTIVE_ROLE, "OWNER").await.unwrap();

        let auth = session(&gateway, &storage);
        auth.bootstrap().await;

        assert!(auth.is_authenticated());
        assert_eq!(auth.active_role(), Role::Owner);
        assert_eq!(auth.token().as_deref(), Some("tok-1"));
        assert_eq!(gateway.auth_token().as_deref(), Some("tok-1"));
        assert_eq!(gateway.profile_fetches.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let gateway = Arc::new(InMemoryGateway::new().with_profile(profile(&["PLAYER"])));
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "tok-1").await.unwrap();

        let auth = session(&gateway, &storage);
        auth.bootstrap().await;
        auth.bootstrap().await;

        assert_eq!(gateway.profile_fetches.load(Ordering::Relaxed), 1);
        assert!(auth.initialized());
    }

    #[tokio::test]
    async fn test_concurrent_bootstraps_share_one_attempt() {
        let gateway = Arc::new(InMemoryGateway::new().with_profile(profile(&["PLAYER"])));
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "tok-1").await.unwrap();

        let auth = Arc::new(session(&gateway, &storage));
        let (a, b) = (auth.clone(), auth.clone());
        tokio::join!(a.bootstrap(), b.bootstrap());

        assert_eq!(gateway.profile_fetches.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_clears_session_when_profile_refresh_fails() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.fail_profile_fetches();
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "stale").await.unwrap();

        let auth = session(&gateway, &storage);
        auth.bootstrap().await;

        assert!(auth.initialized());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(gateway.auth_token(), None);
        assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bootstrap_ignores_corrupt_cached_user() {
        let gateway = Arc::new(InMemoryGateway::new().with_profile(profile(&["PLAYER"])));
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "tok-1").await.unwrap();
        storage.set(keys::USER, "{not json").await.unwrap();

        let auth = session(&gateway, &storage);
        auth.bootstrap().await;

        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user().map(|u| u.id), Some("u-1".to_string()));
    }

    #[tokio::test]
    async fn test_login_stores_session_and_derives_role() {
        let gateway = Arc::new(
            InMemoryGateway::new()
                .with_account("sam@example.test", "pw", Some("tok-9"))
                .with_profile(profile(&["OWNER", "PLAYER"])),
        );
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);

        let user = auth.login("sam@example.test", "pw").await.unwrap();

        assert_eq!(user.id, "u-1");
        assert!(auth.is_authenticated());
        assert_eq!(auth.active_role(), Role::Owner);
        assert_eq!(gateway.auth_token().as_deref(), Some("tok-9"));
        assert_eq!(storage.get(keys::TOKEN).await.unwrap().as_deref(), Some("tok-9"));
        assert_eq!(storage.get(keys::ACTIVE_ROLE).await.unwrap().as_deref(), Some("OWNER"));
    }

    #[tokio::test]
    async fn test_login_without_token_fails_and_leaves_session_untouched() {
        let gateway = Arc::new(
            InMemoryGateway::new().with_account("sam@example.test", "pw", None),
        );
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);

        let result = auth.login("sam@example.test", "pw").await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
        assert_eq!(gateway.auth_token(), None);
    }

    #[tokio::test]
    async fn test_login_transport_error_propagates() {
        let gateway = Arc::new(
            InMemoryGateway::new().with_account("sam@example.test", "pw", Some("t")),
        );
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);

        let result = auth.login("sam@example.test", "wrong").await;
        assert!(matches!(
            result,
            Err(AuthError::Gateway(GatewayError::Status { code: 401 }))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_even_when_remote_fails() {
        let gateway = Arc::new(
            InMemoryGateway::new()
                .with_account("sam@example.test", "pw", Some("tok-9"))
                .with_profile(profile(&["PLAYER"])),
        );
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);
        auth.login("sam@example.test", "pw").await.unwrap();

        gateway.fail_logout();
        let target = auth.logout().await;

        assert_eq!(target.path(), "/login");
        assert!(!auth.is_authenticated());
        assert_eq!(gateway.auth_token(), None);
        assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
        assert_eq!(storage.get(keys::ACTIVE_ROLE).await.unwrap(), None);
        assert_eq!(gateway.logout_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_set_active_role_persists() {
        let gateway = Arc::new(InMemoryGateway::new());
        let storage = Arc::new(InMemoryStore::new());
        let auth = session(&gateway, &storage);

        auth.set_active_role(Role::Owner).await;

        assert_eq!(auth.active_role(), Role::Owner);
        assert_eq!(
            storage.get(keys::ACTIVE_ROLE).await.unwrap().as_deref(),
            Some("OWNER")
        );
    }
}
