use directories::ProjectDirs;
use std::{
    env,
    path::PathBuf,
};

lazy_static::lazy_static! {
    pub(crate) static ref PROJECT_NAME: String = "METRICS_EXPORT".to_string();
    static ref CONFIG_FOLDER: Option<PathBuf> = env::var(format!("{}_CONFIG_DIR", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from);
}

/// Directory holding the optional user `config.yaml`.
///
/// `METRICS_EXPORT_CONFIG_DIR` takes precedence over the platform default.
pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "moonlet", env!("CARGO_PKG_NAME"))
}
