//! services/client/src/services/reports.rs
//!
//! Report generation and scheduling.

use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use sysfree_core::domain::Record;
use sysfree_core::ports::PortResult;
use sysfree_core::query::QueryParams;
use sysfree_core::wire::ApiRequest;

use crate::http::HttpClient;

const REPORTS_PATH: &str = "/api/reportes/";

#[derive(Clone)]
pub struct Reports {
    http: Arc<HttpClient>,
}

impl Reports {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Generates a report and returns the raw document (PDF, spreadsheet, ...).
    pub async fn generate(&self, params: &QueryParams) -> PortResult<Bytes> {
        let request = ApiRequest::get(format!("{REPORTS_PATH}generar/")).with_query(params.to_pairs());
        Ok(self.http.send(request).await?.body)
    }

    pub async fn recent(&self) -> PortResult<Record> {
        self.http
            .send_json(ApiRequest::get(format!("{REPORTS_PATH}recientes/")))
            .await
    }

    pub async fn scheduled(&self) -> PortResult<Record> {
        self.http
            .send_json(ApiRequest::get(format!("{REPORTS_PATH}programados/")))
            .await
    }

    pub async fn schedule(&self, schedule: &Record) -> PortResult<Record> {
        let request = ApiRequest::post(format!("{REPORTS_PATH}programar/")).with_json(schedule)?;
        self.http.send_json(request).await
    }

    pub async fn cancel_scheduled(&self, schedule_id: impl Display) -> PortResult<()> {
        self.http
            .send_empty(ApiRequest::delete(format!("{REPORTS_PATH}programados/{schedule_id}/")))
            .await
    }
}
