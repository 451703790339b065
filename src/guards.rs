//! Navigation guards: allow or redirect based on session state

use crate::auth::AuthSession;
use crate::model::Role;

/// A navigation destination: path plus query pairs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTarget {
    path: String,
    query: Vec<(String, String)>,
}

impl RouteTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Path with query string, e.g. `/login?redirect=/teams`
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Resolution of one guard for one navigation attempt. The pending state is
/// the unresolved future itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Redirect(RouteTarget),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Protect an authenticated route.
///
/// Awaits an in-flight bootstrap if one is needed, then allows authenticated
/// sessions through; everyone else is sent to `/login` with the original
/// target preserved as a `redirect` parameter. Navigating to `/login` itself
/// never appends the parameter, which would otherwise self-reference.
pub async fn auth_guard(auth: &AuthSession, to: &RouteTarget) -> GuardDecision {
    auth.bootstrap().await;

    if auth.is_authenticated() {
        return GuardDecision::Allowed;
    }

    let login = RouteTarget::new("/login");
    if to.path() == "/login" {
        GuardDecision::Redirect(login)
    } else {
        GuardDecision::Redirect(login.with_query("redirect", to.full_path()))
    }
}

/// Protect a guest-only route (login, register).
///
/// Authenticated sessions are sent to their active role's landing page.
pub async fn guest_guard(auth: &AuthSession, _to: &RouteTarget) -> GuardDecision {
    auth.bootstrap().await;

    if auth.is_authenticated() {
        GuardDecision::Redirect(RouteTarget::new(auth.active_role().landing_path()))
    } else {
        GuardDecision::Allowed
    }
}

/// Protect a role-restricted route.
///
/// Sessions whose active role is outside `allowed` are redirected to their
/// own role's landing page rather than blocked with an error.
pub async fn role_guard(auth: &AuthSession, allowed: &[Role], _to: &RouteTarget) -> GuardDecision {
    auth.bootstrap().await;

    let role = auth.active_role();
    if allowed.contains(&role) {
        GuardDecision::Allowed
    } else {
        GuardDecision::Redirect(RouteTarget::new(role.landing_path()))
    }
}

/// Boxed guard future, so differently-typed guards can be composed in one
/// list
pub type GuardFuture<'a> =
    std::pin::Pin<Box<dyn std::future::Future<Output = GuardDecision> + Send + 'a>>;

/// Compose guard decisions left to right; the first redirect wins and later
/// guards are not evaluated.
pub async fn run_guards<I, F>(guards: I) -> GuardDecision
where
    I: IntoIterator<Item = F>,
    F: std::future::Future<Output = GuardDecision>,
{
    for guard in guards {
        match guard.await {
            GuardDecision::Allowed => continue,
            redirect => return redirect,
        }
    }
    GuardDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ClientCredentials;
    use crate::gateway::InMemoryGateway;
    use crate::model::User;
    use crate::observer::NoOpObserver;
    use crate::storage::{keys, InMemoryStore, KeyValueStore};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

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

    async fn authenticated_session(role: &str) -> (Arc<InMemoryGateway>, AuthSession) {
        let gateway = Arc::new(InMemoryGateway::new().with_profile(profile(&[role])));
        let storage = Arc::new(InMemoryStore::new());
        storage.set(keys::TOKEN, "tok-1").await.unwrap();
        storage.set(keys::ACTIVE_ROLE, role).await.unwrap();
        let auth = AuthSession::new(
            gateway.clone(),
            storage,
            Arc::new(NoOpObserver),
            ClientCredentials::new("cid", "sec"),
        );
        (gateway, auth)
    }

    fn guest_session() -> AuthSession {
        AuthSession::new(
            Arc::new(InMemoryGateway::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(NoOpObserver),
            ClientCredentials::new("cid", "sec"),
        )
    }

    #[tokio::test]
    async fn test_auth_guard_redirects_guest_with_original_target() {
        let auth = guest_session();
        let decision = auth_guard(&auth, &RouteTarget::new("/teams")).await;

        assert_eq!(
            decision,
            GuardDecision::Redirect(
                RouteTarget::new("/login").with_query("redirect", "/teams")
            )
        );
    }

    #[tokio::test]
    async fn test_auth_guard_omits_redirect_param_for_login_itself() {
        let auth = guest_session();
        let decision = auth_guard(&auth, &RouteTarget::new("/login")).await;

        match decision {
            GuardDecision::Redirect(target) => {
                assert_eq!(target.full_path(), "/login");
                assert!(target.query().is_empty());
            }
            GuardDecision::Allowed => panic!("guest should not pass auth_guard"),
        }
    }

    #[tokio::test]
    async fn test_auth_guard_allows_authenticated_and_bootstraps_once() {
        let (gateway, auth) = authenticated_session("PLAYER").await;

        let first = auth_guard(&auth, &RouteTarget::new("/dashboard")).await;
        let second = auth_guard(&auth, &RouteTarget::new("/teams")).await;

        assert!(first.is_allowed());
        assert!(second.is_allowed());
        assert_eq!(gateway.profile_fetches.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_guest_guard_sends_authenticated_users_to_their_dashboard() {
        let (_, auth) = authenticated_session("OWNER").await;
        let decision = guest_guard(&auth, &RouteTarget::new("/login")).await;
        assert_eq!(decision, GuardDecision::Redirect(RouteTarget::new("/owner")));

        let guest = guest_session();
        assert!(guest_guard(&guest, &RouteTarget::new("/login")).await.is_allowed());
    }

    #[tokio::test]
    async fn test_role_guard_soft_redirects_to_own_landing_page() {
        let (_, auth) = authenticated_session("PLAYER").await;
        let decision =
            role_guard(&auth, &[Role::Owner], &RouteTarget::new("/owner/listings")).await;

        assert_eq!(decision, GuardDecision::Redirect(RouteTarget::new("/player")));
    }

    #[tokio::test]
    async fn test_role_guard_allows_matching_role() {
        let (_, auth) = authenticated_session("OWNER").await;
        let decision =
            role_guard(&auth, &[Role::Owner], &RouteTarget::new("/owner/listings")).await;
        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn test_guard_composition_short_circuits_on_first_redirect() {
        let (_, auth) = authenticated_session("PLAYER").await;
        let to = RouteTarget::new("/owner/listings");

        let guards: Vec<GuardFuture<'_>> = vec![
            Box::pin(auth_guard(&auth, &to)),
            Box::pin(role_guard(&auth, &[Role::Owner], &to)),
        ];
        let decision = run_guards(guards).await;

        // auth_guard allows, role_guard redirects
        assert_eq!(decision, GuardDecision::Redirect(RouteTarget::new("/player")));
    }
}
