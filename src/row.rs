use crate::{
    errors::ExportError,
    response::{
        QueryResponse,
        Sample,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use serde_json::{
    Number,
    Value,
};

/// One output line: `timestamp,node_id,value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub timestamp: String,
    pub node_id: String,
    pub value: String,
}

impl CsvRow {
    pub fn from_sample(node_id: &str, sample: &Sample) -> Result<Self, ExportError> {
        let Sample(timestamp, value) = sample;
        Ok(Self {
            timestamp: format_timestamp(timestamp)?,
            node_id: node_id.to_string(),
            value: render_value(value)?,
        })
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.timestamp, &self.node_id, &self.value]
    }
}

/// Flattens a response into rows, series by series and sample by sample, in the order the backend sent them.
///
/// Fails on the first sample that cannot be rendered; nothing is skipped.
pub fn rows_from_response(response: &QueryResponse, id_label: &str) -> Result<Vec<CsvRow>, ExportError> {
    let mut rows = Vec::with_capacity(response.sample_count());
    for series in response.series() {
        let node_id = series.node_id(id_label)?;
        for (index, sample) in series.values.iter().enumerate() {
            let row = CsvRow::from_sample(node_id, sample).map_err(|err| match err {
                ExportError::Format { message, source } => ExportError::Format {
                    message: format!("series {node_id:?}, sample {index}: {message}"),
                    source,
                },
                other => other,
            })?;
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Renders seconds since the epoch as ISO-8601 UTC with a literal `Z`.
///
/// Whole seconds give `1970-01-01T00:00:00Z`. Fractional seconds are rounded to microseconds and always printed with
/// six digits, e.g. `2023-11-14T22:13:20.250000Z`.
pub fn format_timestamp(timestamp: &Number) -> Result<String, ExportError> {
    let micros = if let Some(secs) = timestamp.as_i64() {
        secs.checked_mul(1_000_000)
    } else if timestamp.is_u64() {
        None
    } else {
        timestamp
            .as_f64()
            .map(|secs| (secs * 1_000_000.0).round())
            .filter(|micros| micros.is_finite() && *micros >= i64::MIN as f64 && *micros < i64::MAX as f64)
            .map(|micros| micros as i64)
    }
    .ok_or_else(|| ExportError::format(format!("timestamp {timestamp} is out of range")))?;

    let secs = micros.div_euclid(1_000_000);
    let subsec_nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    let observed_at: DateTime<Utc> = DateTime::from_timestamp(secs, subsec_nanos)
        .ok_or_else(|| ExportError::format(format!("timestamp {timestamp} is out of range")))?;

    let format = if subsec_nanos == 0 {
        "%Y-%m-%dT%H:%M:%SZ"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6fZ"
    };
    Ok(observed_at.format(format).to_string())
}

/// Sample values are written exactly as received. Prometheus sends them as strings, some backends as numbers.
///
/// Numbers keep their JSON text (`1.50`, `1e3`, integers wider than 64 bits) since `serde_json` is built with
/// `arbitrary_precision`.
fn render_value(value: &Value) -> Result<String, ExportError> {
    match value {
        Value::String(value) => Ok(value.clone()),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(ExportError::format(format!("sample value {other} is neither a string nor a number"))),
    }
}
