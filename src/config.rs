use crate::records::{DEFAULT_DESIGNERS_KEY, DEFAULT_OBJECTS_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub designers_key: String,
    pub objects_key: String,
    /// Simulated latency applied to every API call.
    pub latency_ms: u64,
    /// Directory for `FileStore`; in-memory storage when unset.
    pub storage_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            designers_key: DEFAULT_DESIGNERS_KEY.to_string(),
            objects_key: DEFAULT_OBJECTS_KEY.to_string(),
            latency_ms: 200,
            storage_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("[config] loaded {}", path.display());
        Ok(config)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = DashboardConfig::from_json_str(r#"{"latency_ms": 0}"#).expect("parse");
        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.designers_key, "dashboard3d_designers");
        assert_eq!(config.objects_key, "dashboard3d_objects");
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn load_reads_file() {
        let tmp_dir = tempfile::tempdir().expect("tmpdir");
        let path = tmp_dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"storage_dir": "/var/lib/dashboard3d"}"#).expect("write");

        let config = DashboardConfig::load(&path).expect("load");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/var/lib/dashboard3d")));
        assert_eq!(config.latency_ms, 200);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            DashboardConfig::from_json_str("latency_ms = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
