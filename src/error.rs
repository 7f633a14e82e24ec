use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request could not complete: {0}")]
    Network(String),
    #[error("service answered {status}{}", status_suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

impl TransportError {
    /// Server supplied `error` message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Schema(_) => None,
        }
    }
}

fn status_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Schema(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("only {expected} files can be uploaded, got {name}")]
    Format { name: String, expected: String },
    #[error("file could not be read: {0}")]
    Read(String),
    #[error("file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid document: {0}")]
    Shape(String),
    #[error("{message}")]
    Submit {
        message: String,
        #[source]
        source: TransportError,
    },
}

impl IngestError {
    pub fn submit(source: TransportError, fallback: &'static str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_owned();
        Self::Submit { message, source }
    }

    /// Whether the failure happened before anything was sent.
    pub fn is_client_side(&self) -> bool {
        !matches!(self, Self::Submit { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitFormError {
    #[error("name is required")]
    MissingName,
    #[error("model is required")]
    MissingModel,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration for {key}: {source}")]
    Duration {
        key: &'static str,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid api url {0:?}, expected an http(s) url or an empty string")]
    Url(String),
}
