//! services/client/src/http.rs
//!
//! The single outbound request path for every API call.
//!
//! Two contracts are enforced here and nowhere else:
//! - the persisted access token, when present, is attached as a bearer credential;
//! - a 401 answer triggers one refresh of the access token followed by one
//!   re-dispatch of the failing request. A request is never retried twice.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use sysfree_core::domain::{AccessToken, RefreshRequest, StorageKey};
use sysfree_core::ports::{Navigator, PortError, PortResult, TokenStore, Transport};
use sysfree_core::wire::{detail_from_body, ApiRequest, ApiResponse};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const LOGIN_PATH: &str = "/api/token/";
pub const REFRESH_PATH: &str = "/api/token/refresh/";

/// Token endpoints never go through 401 recovery.
fn is_token_endpoint(path: &str) -> bool {
    path == LOGIN_PATH || path == REFRESH_PATH
}

pub struct HttpClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    /// Serializes refreshes so concurrent 401s share one refresh call.
    refresh_gate: Mutex<()>,
}

impl HttpClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            tokens,
            navigator,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Sends a request and returns the successful response, or the failure
    /// that remains after at most one refresh-and-retry.
    pub async fn send(&self, mut request: ApiRequest) -> PortResult<ApiResponse> {
        self.attach_credentials(&mut request);
        debug!(method = request.method.as_str(), path = %request.path, "dispatching request");

        let response = self.transport.send(&request).await?;
        if response.status == 401 && !request.retried && !is_token_endpoint(&request.path) {
            let original = PortError::Status {
                status: response.status,
                detail: detail_from_body(&response.body),
            };
            return self.recover(request, original).await;
        }
        response.into_result()
    }

    /// Sends a request and decodes its JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> PortResult<T> {
        self.send(request).await?.json()
    }

    /// Sends a request whose response body is irrelevant.
    pub async fn send_empty(&self, request: ApiRequest) -> PortResult<()> {
        self.send(request).await.map(|_| ())
    }

    fn attach_credentials(&self, request: &mut ApiRequest) {
        if let Some(token) = self.tokens.get(StorageKey::AccessToken).filter(|t| !t.is_empty()) {
            request.bearer = Some(token);
        }
    }

    async fn recover(&self, mut request: ApiRequest, original: PortError) -> PortResult<ApiResponse> {
        request.retried = true;
        info!(path = %request.path, "access token rejected, refreshing");

        let access = match self.refreshed_access_token(request.bearer.as_deref()).await {
            Ok(Some(access)) => access,
            Ok(None) => {
                warn!("no refresh token available, ending session");
                self.teardown();
                return Err(original);
            }
            Err(refresh_error) => {
                error!("token refresh failed: {:?}", refresh_error);
                self.teardown();
                return Err(refresh_error);
            }
        };

        // The retry bypasses recovery: a second 401 goes straight back to the caller.
        request.bearer = Some(access);
        self.transport.send(&request).await?.into_result()
    }

    /// A fresh access token, or `None` when no refresh token is persisted.
    ///
    /// If another request refreshed while this one waited on the gate, the
    /// token it stored is reused instead of refreshing again.
    async fn refreshed_access_token(&self, rejected: Option<&str>) -> PortResult<Option<String>> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.tokens.get(StorageKey::AccessToken).filter(|t| !t.is_empty()) {
            if Some(current.as_str()) != rejected {
                debug!("access token already refreshed by a concurrent request");
                return Ok(Some(current));
            }
        }

        let Some(refresh) = self.tokens.get(StorageKey::RefreshToken).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let access = self.request_refresh(refresh).await?;
        self.tokens.set(StorageKey::AccessToken, &access)?;
        Ok(Some(access))
    }

    /// Calls the refresh endpoint directly, outside the recovery pipeline.
    pub(crate) async fn request_refresh(&self, refresh: String) -> PortResult<String> {
        let request = ApiRequest::post(REFRESH_PATH).with_json(&RefreshRequest { refresh })?;
        let AccessToken { access } = self.transport.send(&request).await?.into_result()?.json()?;
        Ok(access)
    }

    /// Clears the persisted session and forces the login redirect.
    fn teardown(&self) {
        if let Err(e) = self.tokens.clear() {
            error!("failed to clear persisted session: {:?}", e);
        }
        self.navigator.redirect_to_login();
    }
}
