//! crates/sysfree_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client core depends on.
//! These traits form the boundary of the hexagonal architecture: the session
//! lifecycle, the request pipeline and the list controllers only talk to
//! the network, the persisted storage and the navigation layer through them.

use async_trait::async_trait;

use crate::domain::{Page, StorageKey};
use crate::query::QueryParams;
use crate::wire::{ApiRequest, ApiResponse};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the HTTP library and storage backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Could not decode payload: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `detail` message, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait Transport: Send + Sync {
    /// Dispatches a request. Any HTTP status is a successful dispatch;
    /// only failures to obtain a response are errors.
    async fn send(&self, request: &ApiRequest) -> PortResult<ApiResponse>;
}

/// The persisted key-value storage holding the session tokens.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Option<String>;

    fn set(&self, key: StorageKey, value: &str) -> PortResult<()>;

    fn remove(&self, key: StorageKey) -> PortResult<()>;

    /// Removes every session entry.
    fn clear(&self) -> PortResult<()> {
        for key in StorageKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Navigation side effects the request pipeline may force.
pub trait Navigator: Send + Sync {
    /// Hard redirect to the login entry point after the session is torn down.
    fn redirect_to_login(&self);
}

#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetches one page of records for `params` (`page` plus filters).
    async fn fetch_page(&self, params: &QueryParams) -> PortResult<Page<T>>;
}
