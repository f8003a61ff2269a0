//! services/client/src/services/auth.rs
//!
//! Account and token endpoints.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use sysfree_core::domain::{Credentials, TokenPair, UserProfile};
use sysfree_core::ports::PortResult;
use sysfree_core::wire::ApiRequest;

use crate::http::{HttpClient, LOGIN_PATH};

pub const PROFILE_PATH: &str = "/api/usuarios/me/";
pub const USERS_PATH: &str = "/api/usuarios/";
pub const CHANGE_PASSWORD_PATH: &str = "/api/usuarios/change-password/";
pub const PASSWORD_RESET_PATH: &str = "/api/password-reset/";
pub const PASSWORD_RESET_CONFIRM_PATH: &str = "/api/password-reset/confirm/";

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Clone)]
pub struct AuthService {
    http: Arc<HttpClient>,
}

impl AuthService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Exchanges credentials for an access/refresh pair. Does not persist anything.
    pub async fn login(&self, email: &str, password: &str) -> PortResult<TokenPair> {
        let request = ApiRequest::post(LOGIN_PATH).with_json(&Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        self.http.send_json(request).await
    }

    /// Mints a new access token from a refresh token.
    pub async fn refresh_token(&self, refresh: &str) -> PortResult<String> {
        self.http.request_refresh(refresh.to_string()).await
    }

    pub async fn register<B: Serialize + ?Sized>(&self, account: &B) -> PortResult<UserProfile> {
        let request = ApiRequest::post(USERS_PATH).with_json(account)?;
        self.http.send_json(request).await
    }

    pub async fn current_user(&self) -> PortResult<UserProfile> {
        self.http.send_json(ApiRequest::get(PROFILE_PATH)).await
    }

    pub async fn update_profile<B: Serialize + ?Sized>(&self, profile: &B) -> PortResult<UserProfile> {
        let request = ApiRequest::put(PROFILE_PATH).with_json(profile)?;
        self.http.send_json(request).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> PortResult<()> {
        let request = ApiRequest::post(CHANGE_PASSWORD_PATH).with_json(change)?;
        self.http.send_empty(request).await
    }

    pub async fn forgot_password(&self, email: &str) -> PortResult<()> {
        let request = ApiRequest::post(PASSWORD_RESET_PATH).with_json(&json!({ "email": email }))?;
        self.http.send_empty(request).await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> PortResult<()> {
        let request = ApiRequest::post(PASSWORD_RESET_CONFIRM_PATH)
            .with_json(&json!({ "token": token, "password": password }))?;
        self.http.send_empty(request).await
    }
}
