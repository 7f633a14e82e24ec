//! File based ingestion of sensor readings.
//!
//! Both pipelines validate in the same order and stop at the first failure:
//! extension, then JSON syntax, then document shape. Nothing reaches the
//! transport until all three pass.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;
use crate::types::{BulkBatch, BulkEntry, ReadingInput, SingleBatch};

pub mod bulk;
pub mod components;
pub mod single;

/// A user supplied file whose content is only read on demand.
#[allow(async_fn_in_trait)]
pub trait UploadFile {
    fn name(&self) -> String;
    async fn read_text(&self) -> Result<String, IngestError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Idle,
    Validating,
    Reading,
    Parsing,
    Submitting,
    Done { accepted: u64 },
    Failed,
}

impl IngestState {
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Reading | Self::Parsing | Self::Submitting)
    }
}

pub(crate) async fn read_document<D, F>(
    file: &F,
    extension: &str,
    field: &'static str,
    on_state: &mut impl FnMut(IngestState),
) -> Result<D, IngestError>
where
    D: DeserializeOwned,
    F: UploadFile,
{
    on_state(IngestState::Validating);
    let name = file.name();
    if !name.ends_with(extension) {
        return Err(IngestError::Format {
            name,
            expected: extension.to_string(),
        });
    }

    on_state(IngestState::Reading);
    let content = file.read_text().await?;

    on_state(IngestState::Parsing);
    let document: Value = serde_json::from_str(&content).map_err(IngestError::Parse)?;
    if !document.get(field).is_some_and(Value::is_array) {
        return Err(IngestError::Shape(format!("a \"{field}\" array is required")));
    }

    debug!(file = %name, field, "document validated");
    serde_json::from_value(document).map_err(|err| IngestError::Shape(err.to_string()))
}

pub fn sample_single() -> SingleBatch {
    SingleBatch {
        sensors: vec![
            reading(24.5, 45.2, 2.3),
            reading(25.1, 44.8, 2.5),
            reading(23.8, 46.1, 2.1),
        ],
    }
}

pub fn sample_bulk() -> BulkBatch {
    BulkBatch {
        robots: vec![
            BulkEntry {
                robot_id: Some(1),
                sensors: vec![reading(24.5, 45.2, 2.3), reading(25.1, 44.8, 2.5)],
            },
            BulkEntry {
                robot_id: Some(2),
                sensors: vec![reading(23.8, 47.1, 1.9), reading(24.2, 46.5, 2.0)],
            },
        ],
    }
}

fn reading(temperature: f64, humidity: f64, speed: f64) -> ReadingInput {
    ReadingInput {
        temperature,
        humidity,
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFile;

    async fn validate(
        name: &str,
        content: &str,
    ) -> (Result<SingleBatch, IngestError>, Vec<IngestState>) {
        let file = MemoryFile::new(name, content);
        let mut states = Vec::new();
        let result =
            read_document(&file, ".json", "sensors", &mut |state| states.push(state)).await;
        (result, states)
    }

    #[tokio::test]
    async fn wrong_extension_fails_before_reading() {
        let file = MemoryFile::new("readings.csv", "{\"sensors\": []}");
        let mut states = Vec::new();

        let result: Result<SingleBatch, _> =
            read_document(&file, ".json", "sensors", &mut |state| states.push(state)).await;

        assert!(matches!(result, Err(IngestError::Format { .. })));
        assert_eq!(file.reads(), 0);
        assert_eq!(states, [IngestState::Validating]);
    }

    #[tokio::test]
    async fn unparsable_content_is_a_parse_error() {
        let (result, states) = validate("readings.json", "{sensors: [").await;
        assert!(matches!(result, Err(IngestError::Parse(_))));
        assert_eq!(states.last(), Some(&IngestState::Parsing));
    }

    #[tokio::test]
    async fn missing_or_scalar_field_is_a_shape_error() {
        for content in ["{}", "{\"sensors\": 3}", "[]", "{\"sensors\": {\"temperature\": 1}}"] {
            let (result, _) = validate("readings.json", content).await;
            assert!(
                matches!(result, Err(IngestError::Shape(_))),
                "{content} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn mistyped_entries_are_a_shape_error() {
        let (result, _) = validate(
            "readings.json",
            r#"{"sensors": [{"temperature": "hot", "humidity": 1, "speed": 1}]}"#,
        )
        .await;
        assert!(matches!(result, Err(IngestError::Shape(_))));
    }

    #[tokio::test]
    async fn valid_document_passes_through_every_stage() {
        let (result, states) = validate(
            "readings.json",
            r#"{"sensors": [{"temperature": 24.5, "humidity": 45.2, "speed": 2.3}]}"#,
        )
        .await;

        assert_eq!(result.unwrap().sensors.len(), 1);
        assert_eq!(
            states,
            [
                IngestState::Validating,
                IngestState::Reading,
                IngestState::Parsing
            ]
        );
    }

    #[test]
    fn samples_are_valid_upload_documents() {
        let single = serde_json::to_value(sample_single()).unwrap();
        assert_eq!(single["sensors"].as_array().map(Vec::len), Some(3));

        let bulk = serde_json::to_value(sample_bulk()).unwrap();
        assert_eq!(bulk["robots"][1]["robot_id"], 2);
    }
}
