use crate::errors::ExportError;
use metrics_export_config::{
    AuthConfig,
    Step,
};
use std::fmt;
use url::Url;

/// Path of the range query endpoint relative to the backend base URL.
const QUERY_RANGE_PATH: &str = "api/v1/query_range";

/// The per-run part of a request: metric expression and time bounds, all passed to the backend verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRange {
    pub query: String,
    pub start: String,
    pub end: String,
}

impl QueryRange {
    pub fn new(query: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// `<base>/api/v1/query_range?query=..&step=..&start=..&end=..`
    ///
    /// Assembled as a string so the query reaches the backend unescaped. Only bytes that cannot appear in a URL at
    /// all get percent-encoded while parsing.
    pub fn url(&self, base_url: &Url, step: &Step) -> Result<Url, ExportError> {
        let base = base_url.as_str().trim_end_matches('/');
        let raw = format!(
            "{base}/{QUERY_RANGE_PATH}?query={}&step={step}&start={}&end={}",
            self.query, self.start, self.end
        );
        Url::parse(&raw).map_err(|e| ExportError::Configuration(format!("cannot build query URL {raw:?}: {e}")))
    }
}

/// Credentials attached to the request.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Basic { username: String, password: String },
}

impl Auth {
    /// Resolves the configured scheme into concrete credentials.
    ///
    /// `lookup` is asked for the password variable once; the binary passes `std::env::var`, tests pass a closure.
    pub fn resolve(config: &AuthConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ExportError> {
        match config {
            AuthConfig::None => Ok(Auth::None),
            AuthConfig::Basic { username, password_env } => {
                let password = lookup(password_env).ok_or_else(|| {
                    ExportError::Configuration(format!(
                        "environment variable {password_env} must be set to authenticate as {username:?}"
                    ))
                })?;
                Ok(Auth::Basic {
                    username: username.clone(),
                    password,
                })
            }
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://victoria.moonlet.zanko.dev").unwrap()
    }

    #[test]
    fn builds_query_range_url() {
        let step: Step = "60m".parse().unwrap();
        let range = QueryRange::new("saturn_node_retrievals_total", "2023-10-01T00:00:00Z", "2023-10-02T00:00:00Z");
        let url = range.url(&base(), &step).unwrap();
        assert_eq!(
            url.as_str(),
            "https://victoria.moonlet.zanko.dev/api/v1/query_range?query=saturn_node_retrievals_total&step=60m&start=2023-10-01T00:00:00Z&end=2023-10-02T00:00:00Z"
        );
    }

    #[test]
    fn keeps_base_path_and_tolerates_trailing_slash() {
        let step: Step = "30m".parse().unwrap();
        let range = QueryRange::new("up", "0", "3600");
        let base = Url::parse("http://127.0.0.1:8428/select/0/prometheus/").unwrap();
        let url = range.url(&base, &step).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8428/select/0/prometheus/api/v1/query_range?query=up&step=30m&start=0&end=3600"
        );
    }

    #[test]
    fn passes_query_through_without_escaping() {
        let step: Step = "60m".parse().unwrap();
        let range = QueryRange::new("increase(saturn_node_retrievals_total[1h])", "-1d", "now");
        let url = range.url(&base(), &step).unwrap();
        assert_eq!(url.query(), Some("query=increase(saturn_node_retrievals_total[1h])&step=60m&start=-1d&end=now"));
    }

    #[test]
    fn basic_auth_requires_the_password_variable() {
        let config = AuthConfig::default();
        let err = Auth::resolve(&config, |_| None).unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("EXPORTER_PASSWORD"));
    }

    #[test]
    fn basic_auth_reads_the_configured_variable() {
        let config = AuthConfig::Basic {
            username: "exporter".to_string(),
            password_env: "CUSTOM_PASSWORD".to_string(),
        };
        let auth = Auth::resolve(&config, |name| (name == "CUSTOM_PASSWORD").then(|| "s3cret".to_string())).unwrap();
        assert_eq!(
            auth,
            Auth::Basic {
                username: "exporter".to_string(),
                password: "s3cret".to_string(),
            }
        );
        assert!(!format!("{auth:?}").contains("s3cret"));
    }

    #[test]
    fn no_auth_never_reads_the_environment() {
        let auth = Auth::resolve(&AuthConfig::None, |_| panic!("looked up a variable")).unwrap();
        assert_eq!(auth, Auth::None);
    }
}
