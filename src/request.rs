use std::future::Future;

use leptos::{create_local_resource, Resource};
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::TransportError;
use crate::types::{
    BulkBatch, BulkIngestResponse, Created, NewUnit, Reading, RemoteStats, ReportRow,
    ReportScope, SingleBatch, SingleIngestResponse, Unit, UnitId, UnitPatch,
};

pub const UNITS_PATH: &str = "/api/robots";
pub const BULK_UPLOAD_PATH: &str = "/api/robots/bulk-upload";
pub const STATS_PATH: &str = "/api/stats";
pub const REPORT_SUMMARY_PATH: &str = "/api/reports/summary";
pub const REPORT_ALL_PATH: &str = "/api/reports/export-all";

/// Typed access to the remote fleet service. Carries no business logic.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn list_units(&self) -> Result<Vec<Unit>, TransportError>;
    async fn create_unit(&self, unit: &NewUnit) -> Result<Created, TransportError>;
    async fn delete_unit(&self, id: UnitId) -> Result<(), TransportError>;
    async fn update_unit(&self, id: UnitId, patch: &UnitPatch) -> Result<(), TransportError>;
    async fn readings(&self, id: UnitId) -> Result<Vec<Reading>, TransportError>;
    async fn simulate(&self, id: UnitId) -> Result<(), TransportError>;
    async fn ingest(
        &self,
        id: UnitId,
        batch: &SingleBatch,
    ) -> Result<SingleIngestResponse, TransportError>;
    async fn bulk_ingest(&self, batch: &BulkBatch) -> Result<BulkIngestResponse, TransportError>;
    async fn stats(&self) -> Result<RemoteStats, TransportError>;
    async fn report_summary(&self) -> Result<Vec<ReportRow>, TransportError>;
    async fn export_report(&self, scope: ReportScope) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        let bytes = perform_request(request).await?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Schema(err.to_string()))
    }

    async fn json_with_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, TransportError> {
        self.json(self.request(method, path).json(body)).await
    }

    async fn discard(&self, request: RequestBuilder) -> Result<(), TransportError> {
        perform_request(request).await.map(drop)
    }
}

impl Transport for HttpTransport {
    async fn list_units(&self) -> Result<Vec<Unit>, TransportError> {
        self.json(self.request(Method::GET, UNITS_PATH)).await
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<Created, TransportError> {
        self.json_with_body(Method::POST, UNITS_PATH, unit).await
    }

    async fn delete_unit(&self, id: UnitId) -> Result<(), TransportError> {
        self.discard(self.request(Method::DELETE, &format!("{UNITS_PATH}/{id}")))
            .await
    }

    async fn update_unit(&self, id: UnitId, patch: &UnitPatch) -> Result<(), TransportError> {
        self.discard(
            self.request(Method::PUT, &format!("{UNITS_PATH}/{id}"))
                .json(patch),
        )
        .await
    }

    async fn readings(&self, id: UnitId) -> Result<Vec<Reading>, TransportError> {
        self.json(self.request(Method::GET, &format!("/api/sensors/{id}")))
            .await
    }

    async fn simulate(&self, id: UnitId) -> Result<(), TransportError> {
        self.discard(self.request(Method::POST, &format!("/api/simulate/{id}")))
            .await
    }

    async fn ingest(
        &self,
        id: UnitId,
        batch: &SingleBatch,
    ) -> Result<SingleIngestResponse, TransportError> {
        self.json_with_body(
            Method::POST,
            &format!("{UNITS_PATH}/{id}/upload-sensors"),
            batch,
        )
        .await
    }

    async fn bulk_ingest(&self, batch: &BulkBatch) -> Result<BulkIngestResponse, TransportError> {
        self.json_with_body(Method::POST, BULK_UPLOAD_PATH, batch)
            .await
    }

    async fn stats(&self) -> Result<RemoteStats, TransportError> {
        self.json(self.request(Method::GET, STATS_PATH)).await
    }

    async fn report_summary(&self) -> Result<Vec<ReportRow>, TransportError> {
        self.json(self.request(Method::GET, REPORT_SUMMARY_PATH))
            .await
    }

    async fn export_report(&self, scope: ReportScope) -> Result<Vec<u8>, TransportError> {
        let path = match scope {
            ReportScope::Unit(id) => format!("/api/reports/robot/{id}/export"),
            ReportScope::All => REPORT_ALL_PATH.to_string(),
        };
        perform_request(self.request(Method::GET, &path)).await
    }
}

async fn perform_request(request: RequestBuilder) -> Result<Vec<u8>, TransportError> {
    let response = request.send().await?;
    let status = response.status();

    debug!(status = status.as_u16(), url = %response.url(), "response received");

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            message: error_message(response).await,
        });
    }

    Ok(response.bytes().await?.to_vec())
}

async fn error_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice::<ErrorBody>(&bytes).ok()?.error
}

/// Reactive fetch through the transport. Failures are logged and resolve to `None`.
pub fn create_request<Source, T, Fut>(
    source: impl Fn() -> Source + 'static,
    fetch: impl Fn(Source) -> Fut + 'static,
) -> Resource<Source, Option<T>>
where
    Source: PartialEq + Clone + 'static,
    T: Clone + 'static,
    Fut: Future<Output = Result<T, TransportError>> + 'static,
{
    create_local_resource(source, move |source| {
        let request = fetch(source);
        async move {
            match request.await {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("request error: {err}");
                    None
                }
            }
        }
    })
}
