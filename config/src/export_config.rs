use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
    time::Duration,
};
use strum::{
    Display,
    EnumString,
};

/// How the output file is opened.
#[derive(Debug, Default, Clone, Copy, Display, EnumString, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteMode {
    /// Recreate the file; it ends up holding exactly the rows of this run.
    Truncate,
    /// Add rows after whatever the file already holds. Overlapping runs duplicate rows.
    #[default]
    Append,
}

/// Row terminator of the output file.
///
/// `crlf` matches files written by Python's `csv` module, so appending to such a file keeps its line endings uniform.
#[derive(Debug, Default, Clone, Copy, Display, EnumString, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

/// Sampling interval requested from the backend.
///
/// Either a humantime duration (`60m`, `1h30m`) or a plain number of seconds (`3600`, `0.5`). The string as written is
/// what goes over the wire, the parsed duration is only used for validation and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Step {
    raw: String,
    duration: Duration,
}

impl Step {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for Step {
    fn default() -> Self {
        Self {
            raw: "60m".to_string(),
            duration: Duration::from_secs(60 * 60),
        }
    }
}

impl FromStr for Step {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let duration = match raw.parse::<f64>() {
            Ok(secs) if secs > 0.0 => {
                Duration::try_from_secs_f64(secs).map_err(|e| eyre::eyre!("invalid step {raw:?}: {e}"))?
            }
            Ok(_) => eyre::bail!("step must be a positive duration, got {raw:?}"),
            Err(_) => humantime::parse_duration(raw).map_err(|e| eyre::eyre!("invalid step {raw:?}: {e}"))?,
        };
        if duration.is_zero() {
            eyre::bail!("step must be a positive duration, got {raw:?}");
        }
        Ok(Self {
            raw: raw.to_string(),
            duration,
        })
    }
}

impl TryFrom<String> for Step {
    type Error = eyre::Report;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Step> for String {
    fn from(step: Step) -> Self {
        step.raw
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Authentication scheme used against the backend.
///
/// Only the name of the environment variable holding the password is configured. Reading it is left to the caller so
/// the secret never passes through config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AuthConfig {
    None,
    Basic {
        #[serde(default = "default_username")]
        username: String,
        #[serde(default = "default_password_env")]
        password_env: String,
    },
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::Basic {
            username: default_username(),
            password_env: default_password_env(),
        }
    }
}

fn default_username() -> String {
    "exporter".to_string()
}

fn default_password_env() -> String {
    "EXPORTER_PASSWORD".to_string()
}
