#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod export_config;

use app_config::PROJECT_NAME;
pub use app_config::get_config_dir;
pub use args::Args;
pub use export_config::{
    AuthConfig,
    LineEnding,
    Step,
    WriteMode,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;

/// Everything the exporter needs besides the per-run arguments and the password.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub base_url: url::Url,
    #[serde(default)]
    pub step: Step,
    #[serde(default)]
    pub write_mode: WriteMode,
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default = "default_gzip")]
    pub gzip: bool,
    #[serde(default = "default_id_label")]
    pub id_label: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

fn default_gzip() -> bool {
    true
}

fn default_id_label() -> String {
    "id".to_string()
}

impl Config {
    /// Loads the layered configuration: built-in defaults, the user `config.yaml`, the `--config` file and finally
    /// `METRICS_EXPORT_*` environment variables.
    pub fn new(args: &Args) -> Result<Self, config::ConfigError> {
        Self::load(&get_config_dir(), args.config.as_deref(), Self::environment())
    }

    pub fn load(
        config_dir: &Path,
        extra_file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        if let Some(file) = extra_file {
            debug!(?file, "using config file from args");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Yaml));
        }

        builder = builder.add_source(environment);

        let cfg: Self = builder.build()?.try_deserialize()?;

        debug!(
            base_url = %cfg.base_url,
            step = %cfg.step,
            write_mode = %cfg.write_mode,
            line_ending = %cfg.line_ending,
            gzip = cfg.gzip,
            "loaded configuration"
        );

        Ok(cfg)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(&PROJECT_NAME)
            .prefix_separator("_")
            .separator("__")
    }
}
