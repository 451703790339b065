//! Application context: one explicit wiring of stores per process

use crate::auth::{AuthSession, ClientCredentials};
use crate::form::FormSession;
use crate::gateway::ApiGateway;
use crate::observer::SessionObserver;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Explicitly constructed application context.
///
/// Replaces global singleton stores: built once at startup and passed to
/// consumers, so every dependency is visible at the construction site.
pub struct AppContext {
    pub auth: Arc<AuthSession>,
    pub form: Arc<FormSession>,
}

impl AppContext {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        storage: Arc<dyn KeyValueStore>,
        observer: Arc<dyn SessionObserver>,
        client: ClientCredentials,
    ) -> Self {
        let auth = Arc::new(AuthSession::new(
            gateway,
            storage.clone(),
            observer.clone(),
            client,
        ));
        let form = Arc::new(FormSession::new(storage, observer));
        Self { auth, form }
    }

    /// App-start sequence: bootstrap the auth session and restore any
    /// in-progress draft. Never fails; both stores degrade to their empty
    /// defaults.
    pub async fn initialize(&self) {
        self.auth.bootstrap().await;
        self.form.restore().await;
    }
}
