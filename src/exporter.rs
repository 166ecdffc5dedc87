use crate::{
    errors::ExportError,
    request::{
        Auth,
        QueryRange,
    },
    response::{
        ErrorEnvelope,
        QueryResponse,
    },
    row::rows_from_response,
    sink::CsvSink,
};
use metrics_export_config::{
    Config,
    LineEnding,
    Step,
    WriteMode,
};
use std::path::Path;
use url::Url;

/// Result of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub series: usize,
    pub rows: usize,
}

/// One query_range call turned into CSV rows.
///
/// The pipeline is strictly linear: build the URL, fetch, decode, render every row, and only then open the output
/// file. A failure before the last step leaves the output untouched.
#[derive(Debug)]
pub struct Exporter {
    client: reqwest::blocking::Client,
    base_url: Url,
    step: Step,
    write_mode: WriteMode,
    line_ending: LineEnding,
    id_label: String,
    auth: Auth,
}

impl Exporter {
    pub fn new(config: &Config, auth: Auth) -> Result<Self, ExportError> {
        let client = reqwest::blocking::Client::builder()
            .gzip(config.gzip)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExportError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            step: config.step.clone(),
            write_mode: config.write_mode,
            line_ending: config.line_ending,
            id_label: config.id_label.clone(),
            auth,
        })
    }

    /// Resolves credentials through `lookup` first, so a missing password fails before anything touches the network.
    pub fn from_config(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ExportError> {
        let auth = Auth::resolve(&config.auth, lookup)?;
        Self::new(config, auth)
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    #[instrument(level = "debug", skip(self))]
    pub fn export(&self, range: &QueryRange, output_path: &Path) -> Result<ExportSummary, ExportError> {
        let url = range.url(&self.base_url, &self.step)?;
        let body = self.fetch(&url)?;

        let response = QueryResponse::decode(&body)?;
        let rows = rows_from_response(&response, &self.id_label)?;
        debug!(series = response.series().len(), rows = rows.len(), "decoded response");

        let written = CsvSink::open(output_path, self.write_mode, self.line_ending)?.write_all(&rows)?;

        Ok(ExportSummary {
            series: response.series().len(),
            rows: written,
        })
    }

    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ExportError> {
        let mut request = self.client.get(url.clone());
        if let Auth::Basic { username, password } = &self.auth {
            request = request.basic_auth(username, Some(password));
        }

        debug!(%url, auth = ?self.auth, "requesting query_range");
        let response = request.send().map_err(|e| ExportError::transport(url, e))?;
        let status = response.status();
        let body = response.bytes().map_err(|e| ExportError::transport(url, e))?;
        debug!(%status, bytes = body.len(), "received response");

        if !status.is_success() {
            let message = match ErrorEnvelope::parse(&body) {
                Some(envelope) => format!("HTTP {status}: {}", envelope.message()),
                None => format!("HTTP {status}"),
            };
            return Err(ExportError::Transport {
                url: url.to_string(),
                message,
                source: None,
            });
        }

        Ok(body.to_vec())
    }
}
