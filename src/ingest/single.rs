use std::rc::Rc;

use tracing::{error, info};

use crate::error::IngestError;
use crate::fleet::sync::SyncLoop;
use crate::request::Transport;
use crate::types::{SingleBatch, UnitId};

use super::{read_document, IngestState, UploadFile};

pub const INGEST_FAILED: &str = "ingestion failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub unit_id: UnitId,
    pub accepted: u64,
}

impl IngestReport {
    pub fn message(&self) -> String {
        format!("Success! {} readings uploaded.", self.accepted)
    }
}

/// Readings file for one unit. A failed file is never retried, the user starts over.
pub struct IngestionPipeline<T> {
    transport: Rc<T>,
    sync: Rc<SyncLoop<T>>,
    extension: &'static str,
}

impl<T: Transport> IngestionPipeline<T> {
    pub fn new(transport: Rc<T>, sync: Rc<SyncLoop<T>>, extension: &'static str) -> Self {
        Self {
            transport,
            sync,
            extension,
        }
    }

    pub async fn ingest<F: UploadFile>(
        &self,
        unit_id: UnitId,
        file: &F,
        mut on_state: impl FnMut(IngestState),
    ) -> Result<IngestReport, IngestError> {
        match self.submit(unit_id, file, &mut on_state).await {
            Ok(report) => {
                info!(unit_id, accepted = report.accepted, "readings ingested");
                on_state(IngestState::Done {
                    accepted: report.accepted,
                });
                let _ = self.sync.refresh().await;
                Ok(report)
            }
            Err(err) => {
                error!(
                    unit_id,
                    file = %file.name(),
                    client_side = err.is_client_side(),
                    "ingestion failed: {err}"
                );
                on_state(IngestState::Failed);
                Err(err)
            }
        }
    }

    async fn submit<F: UploadFile>(
        &self,
        unit_id: UnitId,
        file: &F,
        on_state: &mut impl FnMut(IngestState),
    ) -> Result<IngestReport, IngestError> {
        let batch: SingleBatch = read_document(file, self.extension, "sensors", on_state).await?;

        on_state(IngestState::Submitting);
        let response = self
            .transport
            .ingest(unit_id, &batch)
            .await
            .map_err(|err| IngestError::submit(err, INGEST_FAILED))?;

        Ok(IngestReport {
            unit_id,
            accepted: response.count,
        })
    }
}
