//! Remote API gateway trait and request plumbing

use crate::model::{
    Event, EventFilter, LoginRequest, ReferenceItem, RegisterRequest, ResetPasswordRequest, Team,
    TokenResponse, User,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request paths for the remote API, pre-versioning.
///
/// Real gateway implementations pair these with
/// [`ApiConfig::versioned_path`].
pub mod paths {
    pub const LOGIN: &str = "/oauth/token";
    pub const PROFILE: &str = "/users/profile";
    pub const REGISTER: &str = "/users/register";
    pub const RESET_PASSWORD: &str = "/user/reset-password";
    pub const LOGOUT: &str = "/user/logout";
    pub const ROLES: &str = "/users/roles";
    pub const SPORTS: &str = "/sports";
    pub const AMENITIES: &str = "/amenities";
    pub const FACILITIES: &str = "/facilities";
    pub const TEAMS: &str = "/teams";
    pub const EVENTS: &str = "/events";
}

/// Gateway endpoint configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    /// Version segment prepended to request paths, e.g. `v1`
    pub api_version: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: api_version.into(),
        }
    }

    /// Prefix `path` with the version segment unless it already carries it.
    pub fn versioned_path(&self, path: &str) -> String {
        if self.api_version.is_empty() {
            return path.to_string();
        }
        let prefix = format!("/{}", self.api_version);
        if path.starts_with(&prefix) {
            path.to_string()
        } else {
            format!("{prefix}{path}")
        }
    }

    /// Full request URL for a path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.versioned_path(path))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(Box<str>),
    #[error("Request failed with status {code}")]
    Status { code: u16 },
    #[error("Response decode error: {0}")]
    Decode(Box<str>),
}

/// Remote API gateway.
///
/// Transport is an external collaborator; implementations wrap an HTTP client
/// that injects `Authorization: Bearer <token>` whenever a credential is set
/// and versions every request path via [`ApiConfig::versioned_path`].
#[async_trait]
pub trait ApiGateway: Send + Sync + 'static {
    /// Replace the default bearer credential for subsequent requests
    fn set_auth_token(&self, token: Option<String>);

    // === Auth ===

    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, GatewayError>;
    async fn fetch_profile(&self) -> Result<User, GatewayError>;
    async fn register(&self, request: &RegisterRequest) -> Result<User, GatewayError>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), GatewayError>;
    async fn logout(&self) -> Result<(), GatewayError>;

    // === Reference data ===

    async fn roles(&self) -> Result<Vec<ReferenceItem>, GatewayError>;
    async fn sports(&self) -> Result<Vec<ReferenceItem>, GatewayError>;
    async fn amenities(&self) -> Result<Vec<ReferenceItem>, GatewayError>;
    async fn facilities(&self) -> Result<Vec<ReferenceItem>, GatewayError>;

    // === Teams ===

    async fn teams(&self) -> Result<Vec<Team>, GatewayError>;
    async fn team(&self, id: &str) -> Result<Team, GatewayError>;
    async fn create_team(&self, team: &Team) -> Result<Team, GatewayError>;
    async fn update_team(&self, id: &str, team: &Team) -> Result<Team, GatewayError>;
    async fn delete_team(&self, id: &str) -> Result<(), GatewayError>;

    // === Events ===

    async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>, GatewayError>;
    async fn event(&self, id: &str) -> Result<Event, GatewayError>;
    async fn create_event(&self, event: &Event) -> Result<Event, GatewayError>;

    // === Users ===

    async fn user(&self, id: &str) -> Result<User, GatewayError>;
    async fn update_user(&self, id: &str, user: &User) -> Result<User, GatewayError>;
}

/// In-memory gateway for testing.
///
/// Holds one account and a fixed profile; counts profile fetches so tests can
/// assert that bootstrap issues exactly one network round-trip.
pub struct InMemoryGateway {
    state: std::sync::RwLock<InMemoryGatewayState>,
    pub profile_fetches: AtomicU64,
    pub logout_calls: AtomicU64,
}

struct InMemoryGatewayState {
    auth_token: Option<String>,
    /// email -> (password, token to grant)
    accounts: HashMap<String, (String, Option<String>)>,
    profile: Option<User>,
    profile_error: bool,
    logout_error: bool,
    reference: HashMap<&'static str, Vec<ReferenceItem>>,
    teams: Vec<Team>,
    events: Vec<Event>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            state: std::sync::RwLock::new(InMemoryGatewayState {
                auth_token: None,
                accounts: HashMap::new(),
                profile: None,
                profile_error: false,
                logout_error: false,
                reference: HashMap::new(),
                teams: Vec::new(),
                events: Vec::new(),
            }),
            profile_fetches: AtomicU64::new(0),
            logout_calls: AtomicU64::new(0),
        }
    }

    /// Register an account; `token` is what a successful login returns
    /// (`None` simulates a tokenless 200 response).
    pub fn with_account(self, email: &str, password: &str, token: Option<&str>) -> Self {
        if let Ok(mut s) = self.state.write() {
            s.accounts
                .insert(email.into(), (password.into(), token.map(Into::into)));
        }
        self
    }

    pub fn with_profile(self, profile: User) -> Self {
        if let Ok(mut s) = self.state.write() {
            s.profile = Some(profile);
        }
        self
    }

    /// Make subsequent profile fetches fail with a transport error
    pub fn fail_profile_fetches(&self) {
        if let Ok(mut s) = self.state.write() {
            s.profile_error = true;
        }
    }

    /// Make the remote logout call fail
    pub fn fail_logout(&self) {
        if let Ok(mut s) = self.state.write() {
            s.logout_error = true;
        }
    }

    pub fn with_reference(self, kind: &'static str, items: Vec<ReferenceItem>) -> Self {
        if let Ok(mut s) = self.state.write() {
            s.reference.insert(kind, items);
        }
        self
    }

    /// Credential currently installed on the gateway
    pub fn auth_token(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.auth_token.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, InMemoryGatewayState>, GatewayError> {
        self.state
            .read()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))
    }

    fn reference_list(&self, kind: &'static str) -> Result<Vec<ReferenceItem>, GatewayError> {
        Ok(self.read()?.reference.get(kind).cloned().unwrap_or_default())
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiGateway for InMemoryGateway {
    fn set_auth_token(&self, token: Option<String>) {
        if let Ok(mut s) = self.state.write() {
            s.auth_token = token;
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, GatewayError> {
        let state = self.read()?;
        match state.accounts.get(&request.email) {
            Some((password, token)) if *password == request.password => Ok(TokenResponse {
                access_token: token.clone(),
                refresh_token: None,
                expires_at: None,
                token_type: Some("Bearer".into()),
            }),
            Some(_) => Err(GatewayError::Status { code: 401 }),
            None => Err(GatewayError::Status { code: 404 }),
        }
    }

    async fn fetch_profile(&self) -> Result<User, GatewayError> {
        self.profile_fetches.fetch_add(1, Ordering::Relaxed);
        let state = self.read()?;
        if state.auth_token.is_none() {
            return Err(GatewayError::Status { code: 401 });
        }
        if state.profile_error {
            return Err(GatewayError::Transport("connection reset".into()));
        }
        state.profile.clone().ok_or(GatewayError::Status { code: 404 })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User, GatewayError> {
        Ok(User {
            id: format!("u-{}", request.email),
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            roles: vec!["PLAYER".into()],
            created_at: None,
            updated_at: None,
        })
    }

    async fn reset_password(&self, _request: &ResetPasswordRequest) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.logout_calls.fetch_add(1, Ordering::Relaxed);
        if self.read()?.logout_error {
            return Err(GatewayError::Transport("connection reset".into()));
        }
        Ok(())
    }

    async fn roles(&self) -> Result<Vec<ReferenceItem>, GatewayError> {
        self.reference_list("roles")
    }

    async fn sports(&self) -> Result<Vec<ReferenceItem>, GatewayError> {
        self.reference_list("sports")
    }

    async fn amenities(&self) -> Result<Vec<ReferenceItem>, GatewayError> {
        self.reference_list("amenities")
    }

    async fn facilities(&self) -> Result<Vec<ReferenceItem>, GatewayError> {
        self.reference_list("facilities")
    }

    async fn teams(&self) -> Result<Vec<Team>, GatewayError> {
        Ok(self.read()?.teams.clone())
    }

    async fn team(&self, id: &str) -> Result<Team, GatewayError> {
        self.read()?
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(GatewayError::Status { code: 404 })
    }

    async fn create_team(&self, team: &Team) -> Result<Team, GatewayError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))?;
        state.teams.push(team.clone());
        Ok(team.clone())
    }

    async fn update_team(&self, id: &str, team: &Team) -> Result<Team, GatewayError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))?;
        match state.teams.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = team.clone();
                Ok(team.clone())
            }
            None => Err(GatewayError::Status { code: 404 }),
        }
    }

    async fn delete_team(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))?;
        state.teams.retain(|t| t.id != id);
        Ok(())
    }

    async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>, GatewayError> {
        let state = self.read()?;
        Ok(state
            .events
            .iter()
            .filter(|e| {
                filter
                    .event_type
                    .as_ref()
                    .map(|t| e.event_type.as_ref() == Some(t))
                    .unwrap_or(true)
                    && filter
                        .date
                        .as_ref()
                        .map(|d| e.date.as_ref() == Some(d))
                        .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    async fn event(&self, id: &str) -> Result<Event, GatewayError> {
        self.read()?
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(GatewayError::Status { code: 404 })
    }

    async fn create_event(&self, event: &Event) -> Result<Event, GatewayError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))?;
        state.events.push(event.clone());
        Ok(event.clone())
    }

    async fn user(&self, _id: &str) -> Result<User, GatewayError> {
        let state = self.read()?;
        state.profile.clone().ok_or(GatewayError::Status { code: 404 })
    }

    async fn update_user(&self, _id: &str, user: &User) -> Result<User, GatewayError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| GatewayError::Transport(e.to_string().into()))?;
        state.profile = Some(user.clone());
        Ok(user.clone())
    }
}
