//! crates/sysfree_core/src/domain.rs
//!
//! Defines the pure, core data structures of the SysFree client.
//! These structs know nothing about transports or storage backends; the only
//! concession to the wire is the serde mapping of the backend's field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size the backend uses when a response omits `page_size`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A generic backend record for collections without a dedicated type.
pub type Record = Value;

//=========================================================================================
// Session
//=========================================================================================

/// The lifecycle position of the authentication session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Authenticated,
    Anonymous,
    Error,
}

/// The profile returned by `GET /api/usuarios/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(rename = "nombres", default)]
    pub first_names: String,
    #[serde(rename = "apellidos", default)]
    pub last_names: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Any field the backend sends that this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// `"Nombres Apellidos"`, falling back to the email when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_names.trim(), self.last_names.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Body of `POST /api/token/`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response of `POST /api/token/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of `POST /api/token/refresh/`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of `POST /api/token/refresh/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

/// The keys of the persisted key-value storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    /// The key name as it appears in persisted storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "token",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

//=========================================================================================
// Record Page
//=========================================================================================

/// One slice of a paginated collection, as returned by `GET <collection>/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl<T> Page<T> {
    /// The server page size, or [`DEFAULT_PAGE_SIZE`] when omitted or zero.
    pub fn effective_page_size(&self) -> u64 {
        match self.page_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// `ceil(count / page_size)`.
    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(self.effective_page_size())
    }
}
