//! The query_range JSON envelope.
//!
//! ```json
//! { "status": "success",
//!   "data": { "resultType": "matrix",
//!             "result": [ { "metric": { "id": "node-1" }, "values": [ [0, "1.5"], [3600, "2.0"] ] } ] } }
//! ```
//!
//! Only `data.result[].metric` and `data.result[].values` are required. Every sample must be a `[timestamp, value]`
//! pair, otherwise the whole body is rejected.

use crate::errors::ExportError;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub data: QueryData,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
    data: Option<QueryData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: Option<String>,
    pub result: Vec<SeriesResult>,
}

/// One labelled series as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResult {
    pub metric: BTreeMap<String, String>,
    pub values: Vec<Sample>,
}

/// A `[timestamp, value]` pair, both kept as raw JSON until the row is rendered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sample(pub serde_json::Number, pub serde_json::Value);

/// Error envelope a Prometheus-compatible backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(rename = "errorType", default)]
    pub(crate) error_type: Option<String>,
    pub(crate) error: String,
}

impl ErrorEnvelope {
    pub(crate) fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub(crate) fn message(&self) -> String {
        match &self.error_type {
            Some(kind) => format!("{kind}: {}", self.error),
            None => self.error.clone(),
        }
    }
}

impl QueryResponse {
    /// Parses a complete response body.
    pub fn decode(body: &[u8]) -> Result<Self, ExportError> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        if envelope.status.as_deref() == Some("error") {
            let kind = envelope.error_type.as_deref().unwrap_or("error");
            let message = envelope.error.as_deref().unwrap_or("no message");
            return Err(ExportError::format(format!("backend reported {kind}: {message}")));
        }
        let data = envelope.data.ok_or_else(|| ExportError::format("missing field `data`"))?;
        if let Some(kind) = data.result_type.as_deref() {
            if kind != "matrix" {
                debug!(result_type = kind, "unexpected resultType, decoding as matrix anyway");
            }
        }
        Ok(Self { data })
    }

    pub fn series(&self) -> &[SeriesResult] {
        &self.data.result
    }

    pub fn sample_count(&self) -> usize {
        self.data.result.iter().map(|series| series.values.len()).sum()
    }
}

impl SeriesResult {
    /// The series identifier: the value of `label` in the metric's label set.
    pub fn node_id(&self, label: &str) -> Result<&str, ExportError> {
        self.metric
            .get(label)
            .map(String::as_str)
            .ok_or_else(|| ExportError::format(format!("series {:?} has no {label:?} label", self.metric)))
    }
}
