//! crates/sysfree_core/src/wire.rs
//!
//! Transport-neutral request and response values exchanged with the
//! `Transport` port. Adapters translate these to and from a concrete HTTP
//! library; everything above the port only ever sees these types.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// An outbound API call, relative to the configured origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer credential sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
    /// Set once the request has gone through 401 recovery.
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serializes `body` as the JSON payload of the request.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> PortResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| PortError::Decode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// A response as delivered by the transport, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into `PortError::Status`.
    pub fn into_result(self) -> PortResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(PortError::Status {
                status: self.status,
                detail: detail_from_body(&self.body),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> PortResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| PortError::Decode(e.to_string()))
    }
}

/// Extracts the backend's `detail` message from a JSON error body.
pub fn detail_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
