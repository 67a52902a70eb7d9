//! Backup run configuration
//!

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings passed to the external copy tool for each folder copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyToolConfig {
    /// Retries for a failed copy.
    pub retry_count: u32,

    /// Seconds to wait between retries.
    pub retry_wait_seconds: u32,

    /// Copy threads inside a single tool invocation.
    pub thread_count: u32,
}

impl Default for CopyToolConfig {
    fn default() -> Self {
        Self {
            retry_count: 2,
            retry_wait_seconds: 5,
            thread_count: 8,
        }
    }
}

/// The run's config. Created once before dispatch, read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The directory containing the user profiles.
    pub profiles_root: PathBuf,

    /// The directory the backups are written to.
    pub destination_root: PathBuf,

    /// The profile subfolders to copy.
    pub folders: Vec<String>,

    /// Whether files over `max_file_bytes` are skipped.
    pub skip_large_files: bool,

    /// The size threshold for `skip_large_files`.
    pub max_file_bytes: u64,

    /// The maximum number of profiles backed up at once.
    pub max_concurrent_targets: usize,

    /// Extensions of mail data files swept from the whole profile.
    pub archive_extensions: Vec<String>,

    /// The copy tool's settings.
    pub copy_tool: CopyToolConfig,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile);
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profiles_root: PathBuf::from(r"C:\Users"),
            destination_root: PathBuf::from(r"D:\UserBackups"),
            folders: vec![
                "Desktop".to_string(),
                "Documents".to_string(),
                "Downloads".to_string(),
                "Pictures".to_string(),
                "Videos".to_string(),
                "Favorites".to_string(),
            ],
            skip_large_files: false,
            max_file_bytes: 1024 * 1024 * 256, // 256 MiB
            max_concurrent_targets: 4,
            archive_extensions: vec!["pst".to_string(), "ost".to_string()],
            copy_tool: CopyToolConfig::default(),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file does not exist.")]
    NoFile,

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}
