use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pomotimer").map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("pomotimer"),
            )
        } else {
            ProjectDirs::from("", "", "pomotimer").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
