//! services/client/src/services/resource.rs
//!
//! A REST collection following the backend's conventions: `GET <path>` is
//! paginated, items live at `<path><id>/`, and extra actions hang off either
//! the collection or an item.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sysfree_core::domain::{Page, Record};
use sysfree_core::ports::{PageFetcher, PortResult};
use sysfree_core::query::QueryParams;
use sysfree_core::wire::ApiRequest;

use crate::http::HttpClient;

pub struct Resource<T = Record> {
    http: Arc<HttpClient>,
    path: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// `path` is the collection path with its trailing slash, e.g. `/api/ventas/ventas/`.
    pub fn new(http: Arc<HttpClient>, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn item_path(&self, id: impl Display) -> String {
        format!("{}{}/", self.path, id)
    }

    pub async fn list(&self, params: &QueryParams) -> PortResult<Page<T>> {
        let request = ApiRequest::get(self.path.as_str()).with_query(params.to_pairs());
        self.http.send_json(request).await
    }

    pub async fn get(&self, id: impl Display) -> PortResult<T> {
        self.http.send_json(ApiRequest::get(self.item_path(id))).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> PortResult<T> {
        let request = ApiRequest::post(self.path.as_str()).with_json(body)?;
        self.http.send_json(request).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> PortResult<T> {
        let request = ApiRequest::put(self.item_path(id)).with_json(body)?;
        self.http.send_json(request).await
    }

    pub async fn delete(&self, id: impl Display) -> PortResult<()> {
        self.http.send_empty(ApiRequest::delete(self.item_path(id))).await
    }

    /// `POST <path><id>/<name>/`.
    pub async fn action(&self, id: impl Display, name: &str, body: Option<&Record>) -> PortResult<Record> {
        let mut request = ApiRequest::post(format!("{}{}/", self.item_path(id), name));
        request.body = body.cloned();
        self.send_action(request).await
    }

    /// `POST <path><name>/`.
    pub async fn collection_action(&self, name: &str, body: Option<&Record>) -> PortResult<Record> {
        let mut request = ApiRequest::post(format!("{}{}/", self.path, name));
        request.body = body.cloned();
        self.send_action(request).await
    }

    /// `GET <path><name>/` with optional query parameters.
    pub async fn collection_query<R: DeserializeOwned>(&self, name: &str, params: &QueryParams) -> PortResult<R> {
        let request = ApiRequest::get(format!("{}{}/", self.path, name)).with_query(params.to_pairs());
        self.http.send_json(request).await
    }

    /// `GET <path><id>/<name>/`.
    pub async fn item_query<R: DeserializeOwned>(&self, id: impl Display, name: &str) -> PortResult<R> {
        self.http
            .send_json(ApiRequest::get(format!("{}{}/", self.item_path(id), name)))
            .await
    }

    /// Action endpoints may answer with an empty body.
    async fn send_action(&self, request: ApiRequest) -> PortResult<Record> {
        let response = self.http.send(request).await?;
        if response.body.is_empty() {
            Ok(Record::Null)
        } else {
            response.json()
        }
    }
}

#[async_trait]
impl<T> PageFetcher<T> for Resource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, params: &QueryParams) -> PortResult<Page<T>> {
        self.list(params).await
    }
}
