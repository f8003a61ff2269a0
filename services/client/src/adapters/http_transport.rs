//! services/client/src/adapters/http_transport.rs
//!
//! This module contains the adapter for the SysFree REST backend over HTTP.
//! It implements the `Transport` port from the `core` crate using `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use sysfree_core::ports::{PortError, PortResult, Transport};
use sysfree_core::wire::{ApiRequest, ApiResponse, Method};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `Transport` port with a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport` rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> PortResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

//=========================================================================================
// `Transport` Trait Implementation
//=========================================================================================

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> PortResult<ApiResponse> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        }
        .header(header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        // Only failing to get any response is an error at this layer.
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;

        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_the_origin() {
        let transport = ReqwestTransport::new("http://localhost:8000/", None).unwrap();
        assert_eq!(
            transport.url("/api/token/"),
            "http://localhost:8000/api/token/"
        );
        assert_eq!(
            transport.url("api/tienda/carrito/"),
            "http://localhost:8000/api/tienda/carrito/"
        );
    }
}
