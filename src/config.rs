use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Collection settings, fixed once a `Collector` is built.
///
/// Every field has a default, so `{}` is a valid config file and yields a
/// disabled collector writing under `csv_metrics/` and `json_metrics/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    /// Master switch. When false every collector operation is a no-op.
    #[serde(default)]
    pub collect: bool,

    /// Directory for per-histogram distribution files
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,

    /// Directory for Guesstimate model documents
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("csv_metrics")
}
fn default_json_dir() -> PathBuf {
    PathBuf::from("json_metrics")
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            collect: false,
            csv_dir: default_csv_dir(),
            json_dir: default_json_dir(),
        }
    }
}

impl CollectConfig {
    /// Enabled config with the default output directories.
    pub fn enabled() -> Self {
        Self {
            collect: true,
            ..Self::default()
        }
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: Error| Error::Config {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let raw = std::fs::read_to_string(path).map_err(|e| wrap(Error::io(path, e)))?;
        serde_json::from_str(&raw).map_err(|e| wrap(Error::Json(e)))
    }
}
