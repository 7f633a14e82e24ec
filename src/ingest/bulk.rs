use std::rc::Rc;

use tracing::{error, info, warn};

use crate::error::IngestError;
use crate::fleet::sync::SyncLoop;
use crate::request::Transport;
use crate::types::{BulkBatch, BulkIngestResponse, PerUnitResult};

use super::{read_document, IngestState, UploadFile};

pub const BULK_INGEST_FAILED: &str = "bulk ingestion failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub outcome: LineOutcome,
    pub text: String,
}

impl From<&PerUnitResult> for ResultLine {
    fn from(result: &PerUnitResult) -> Self {
        match result {
            PerUnitResult::Success {
                robot_name, count, ..
            } => Self {
                outcome: LineOutcome::Success,
                text: format!("{robot_name}: {count} readings uploaded"),
            },
            PerUnitResult::Error { robot_id, message } => {
                let unit =
                    robot_id.map_or_else(|| "Unit".to_string(), |id| format!("Unit ID {id}"));
                Self {
                    outcome: LineOutcome::Error,
                    text: format!(
                        "{unit}: {}",
                        message.as_deref().unwrap_or("upload failed")
                    ),
                }
            }
        }
    }
}

/// One summary line plus one line per returned entry, in the order returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub summary: String,
    pub lines: Vec<ResultLine>,
}

impl From<&BulkIngestResponse> for BulkReport {
    fn from(response: &BulkIngestResponse) -> Self {
        Self {
            summary: format!("{} readings uploaded in total.", response.total_sensors),
            lines: response.results.iter().map(ResultLine::from).collect(),
        }
    }
}

/// Multi-unit batches. Entries fail independently and every one of them is reported.
pub struct BulkIngestionAggregator<T> {
    transport: Rc<T>,
    sync: Rc<SyncLoop<T>>,
    extension: &'static str,
}

impl<T: Transport> BulkIngestionAggregator<T> {
    pub fn new(transport: Rc<T>, sync: Rc<SyncLoop<T>>, extension: &'static str) -> Self {
        Self {
            transport,
            sync,
            extension,
        }
    }

    pub async fn ingest<F: UploadFile>(
        &self,
        file: &F,
        mut on_state: impl FnMut(IngestState),
    ) -> Result<BulkReport, IngestError> {
        match self.submit(file, &mut on_state).await {
            Ok(response) => {
                let report = BulkReport::from(&response);
                let failed = report
                    .lines
                    .iter()
                    .filter(|line| line.outcome == LineOutcome::Error)
                    .count();
                info!(
                    total = response.total_sensors,
                    entries = report.lines.len(),
                    failed,
                    "bulk readings ingested"
                );
                on_state(IngestState::Done {
                    accepted: response.total_sensors,
                });
                let _ = self.sync.refresh().await;
                Ok(report)
            }
            Err(err) => {
                error!(
                    file = %file.name(),
                    client_side = err.is_client_side(),
                    "bulk ingestion failed: {err}"
                );
                on_state(IngestState::Failed);
                Err(err)
            }
        }
    }

    async fn submit<F: UploadFile>(
        &self,
        file: &F,
        on_state: &mut impl FnMut(IngestState),
    ) -> Result<BulkIngestResponse, IngestError> {
        let batch: BulkBatch = read_document(file, self.extension, "robots", on_state).await?;

        on_state(IngestState::Submitting);
        let response = self
            .transport
            .bulk_ingest(&batch)
            .await
            .map_err(|err| IngestError::submit(err, BULK_INGEST_FAILED))?;

        if response.results.len() != batch.robots.len() {
            warn!(
                submitted = batch.robots.len(),
                returned = response.results.len(),
                "bulk result count differs from submitted entries"
            );
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::testing::{unit, Call, Harness, MemoryFile};
    use crate::types::UnitStatus;

    const MIXED: &str = r#"{"robots":[
        {"robotId":1,"sensors":[{"temperature":24.5,"humidity":45.2,"speed":2.3}]},
        {"robotId":99,"sensors":[]}
    ]}"#;

    #[tokio::test]
    async fn partial_failure_reports_every_entry() {
        let harness = Harness::new(vec![unit(1, UnitStatus::Active, 90)]);
        let file = MemoryFile::new("fleet.json", MIXED);

        let report = harness.app.bulk.ingest(&file, |_| {}).await.unwrap();

        assert_eq!(report.summary, "1 readings uploaded in total.");
        assert_eq!(
            report.lines,
            [
                ResultLine {
                    outcome: LineOutcome::Success,
                    text: "Unit 1: 1 readings uploaded".to_string()
                },
                ResultLine {
                    outcome: LineOutcome::Error,
                    text: "Unit ID 99: unit not found".to_string()
                }
            ]
        );
        assert!(matches!(harness.transport.calls()[0], Call::BulkIngest(_)));
        assert_eq!(harness.transport.calls()[1], Call::ListUnits);
        assert_eq!(harness.sink.renders(), 1);
    }

    #[tokio::test]
    async fn entry_without_id_does_not_block_its_siblings() {
        let harness = Harness::new(vec![unit(1, UnitStatus::Active, 90)]);
        let file = MemoryFile::new(
            "fleet.json",
            r#"{"robots":[
                {"robotId":1,"sensors":[{"temperature":24.5,"humidity":45.2,"speed":2.3}]},
                {"sensors":[{"temperature":23.8,"humidity":47.1,"speed":1.9}]}
            ]}"#,
        );

        let report = harness.app.bulk.ingest(&file, |_| {}).await.unwrap();

        let calls = harness.transport.calls();
        let bulk_calls = calls
            .iter()
            .filter(|call| matches!(call, Call::BulkIngest(_)))
            .count();
        assert_eq!(bulk_calls, 1);
        assert_eq!(report.summary, "1 readings uploaded in total.");
        assert_eq!(
            report.lines,
            [
                ResultLine {
                    outcome: LineOutcome::Success,
                    text: "Unit 1: 1 readings uploaded".to_string()
                },
                ResultLine {
                    outcome: LineOutcome::Error,
                    text: "Unit: robot_id required".to_string()
                }
            ]
        );
    }

    #[test]
    fn every_returned_entry_gets_one_line_in_order() {
        let response = BulkIngestResponse {
            total_sensors: 5,
            results: vec![
                PerUnitResult::Error {
                    robot_id: Some(3),
                    message: None,
                },
                PerUnitResult::Success {
                    robot_id: 2,
                    robot_name: "Beta".to_string(),
                    count: 5,
                },
                PerUnitResult::Error {
                    robot_id: None,
                    message: Some("robot_id required".to_string()),
                },
            ],
        };

        let report = BulkReport::from(&response);

        assert_eq!(report.lines.len(), response.results.len());
        assert_eq!(report.lines[0].text, "Unit ID 3: upload failed");
        assert_eq!(report.lines[1].text, "Beta: 5 readings uploaded");
        assert_eq!(report.lines[2].text, "Unit: robot_id required");
    }

    #[tokio::test]
    async fn missing_robots_array_sends_nothing() {
        let harness = Harness::new(Vec::new());
        for content in [r#"{"sensors": []}"#, r#"{"robots": "all"}"#] {
            let file = MemoryFile::new("fleet.json", content);
            let err = harness.app.bulk.ingest(&file, |_| {}).await.unwrap_err();
            assert!(matches!(err, IngestError::Shape(_)));
        }
        assert!(harness.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_batch_does_not_refresh() {
        let harness = Harness::new(Vec::new());
        harness.transport.fail_bulk(TransportError::Status {
            status: 400,
            message: None,
        });
        let file = MemoryFile::new("fleet.json", r#"{"robots": []}"#);

        let err = harness.app.bulk.ingest(&file, |_| {}).await.unwrap_err();

        assert_eq!(err.to_string(), BULK_INGEST_FAILED);
        assert_eq!(harness.sink.renders(), 0);
    }
}
