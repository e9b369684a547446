//! Request and outcome value types exchanged with the analysis backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SourceFileError, TransportError};
use crate::model::{Endpoint, ParamValue};

/// Flat mapping from parameter id to value, sent as the request body
pub type Payload = BTreeMap<String, ParamValue>;

/// Document formats the backend can ingest, by lowercase extension
pub const SUPPORTED_EXTENSIONS: [&str; 11] = [
    "xml", "dbk", "docbook", "doc", "docx", "odt", "rtf", "md", "txt", "html", "htm",
];

/// Encode a payload as the JSON request body
pub fn encode_payload(payload: &Payload) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(payload)
}

/// Decode a JSON request body back into a payload
pub fn decode_payload(bytes: &[u8]) -> serde_json::Result<Payload> {
    serde_json::from_slice(bytes)
}

/// A source document selected for analysis.
///
/// Travels beside the payload, never inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SourceFileError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SourceFileError::Missing(path));
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SourceFileError::UnsupportedFormat { path, extension });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A validated configuration ready for dispatch.
///
/// Only produced by [`crate::builder::ConfigurationBuilder`], so the payload
/// key set always equals the mode's declared parameter ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    mode: Endpoint,
    payload: Payload,
    source_file: Option<SourceFile>,
}

impl AnalysisRequest {
    pub(crate) fn new(mode: Endpoint, payload: Payload, source_file: Option<SourceFile>) -> Self {
        Self {
            mode,
            payload,
            source_file,
        }
    }

    pub fn mode(&self) -> Endpoint {
        self.mode
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn source_file(&self) -> Option<&SourceFile> {
        self.source_file.as_ref()
    }

    /// Payload as the JSON body text
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.payload)
    }
}

/// Reply body the backend sends on completion. Not part of the status contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub archetypes: BTreeMap<String, String>,
    #[serde(default)]
    pub results_file: Option<String>,
}

/// What one dispatch produced. Not retained after it is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub mode: Endpoint,
    /// HTTP status, absent when the transport failed before a response
    pub status_code: Option<u16>,
    pub succeeded: bool,
    pub reply: Option<BackendReply>,
    pub error: Option<TransportError>,
}

impl AnalysisOutcome {
    pub fn from_status(mode: Endpoint, status_code: u16, reply: Option<BackendReply>) -> Self {
        Self {
            mode,
            status_code: Some(status_code),
            succeeded: is_success_status(status_code),
            reply,
            error: None,
        }
    }

    pub fn from_transport_error(mode: Endpoint, error: TransportError) -> Self {
        Self {
            mode,
            status_code: None,
            succeeded: false,
            reply: None,
            error: Some(error),
        }
    }
}

/// Any 2xx counts as success
pub fn is_success_status(code: u16) -> bool {
    (200..300).contains(&code)
}
