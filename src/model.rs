//! Account, token, and directory data types

use serde::{Deserialize, Serialize};

/// Role a session operates as, independent of the full role list a user holds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Books venues and joins teams (the default for unknown roles)
    #[default]
    #[serde(rename = "PLAYER")]
    Player,
    /// Lists and manages venues
    #[serde(rename = "OWNER")]
    Owner,
}

impl Role {
    /// Parse a wire role string; anything unrecognised maps to `Player`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "OWNER" | "owner" => Self::Owner,
            _ => Self::Player,
        }
    }

    /// Derive the active role from a profile's role list: first role wins,
    /// empty list defaults to `Player`.
    pub fn from_role_list(roles: &[String]) -> Self {
        roles.first().map(|r| Self::from_wire(r)).unwrap_or_default()
    }

    /// Landing page for this role's dashboard
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Owner => "/owner",
            Self::Player => "/player",
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Player => "PLAYER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user profile as returned by the gateway
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    /// Full set of roles held; the session's active role is derived from it
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Token grant response from the login endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Absent when the gateway answered without a usable credential
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
}

/// Password-grant login request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
}

impl LoginRequest {
    /// Build a password-grant request with the configured client identity
    pub fn password_grant(email: &str, password: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant_type: "password".into(),
        }
    }
}

/// Registration request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub gender: String,
    pub agree_terms: bool,
}

/// Password reset request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Reference-data entry (roles, sports, amenities, facilities)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: String,
    pub name: String,
}

/// Team directory entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// Event directory entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue_id: Option<String>,
}

/// Optional filters for the event listing endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub date: Option<String>,
}
