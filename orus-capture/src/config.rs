//! Pipeline configuration.
//!
//! Every knob of a run is collected into an immutable [`CaptureConfig`],
//! optionally loaded from a TOML file, and validated once at the boundary
//! before any capture work starts.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Smallest accepted node number.
pub const MIN_NODE_NUMBER: u8 = 1;

/// Largest accepted node number; node names are zero-padded to two digits.
pub const MAX_NODE_NUMBER: u8 = 99;

/// Bucket all artifacts are uploaded to unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "orus-repo-01";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {error}")]
    Read {
        error: std::io::Error,
        path: String,
    },

    #[error("failed to parse config file {path}: {error}")]
    Parse {
        error: toml::de::Error,
        path: String,
    },

    #[error("node number {0} is out of range (1..=99)")]
    NodeNumber(u8),

    #[error("monitor index {index} is out of range (1..={count})")]
    MonitorIndex { index: usize, count: usize },

    #[error("save directory {0} does not exist or is not a directory")]
    SaveDir(String),
}

/// Where and how to upload the session's artifacts.
#[derive(Deserialize, Debug, Clone)]
pub struct UploadConfig {
    /// Object-store base URL.
    pub endpoint: String,

    #[serde(default = "bucket_default")]
    pub bucket: String,
}

fn bucket_default() -> String {
    DEFAULT_BUCKET.to_string()
}

/// One pipeline run's complete configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct CaptureConfig {
    /// Directory the artifact tree is written under.
    pub save_dir: PathBuf,

    /// Node number encoded into every artifact name (1-99).
    pub node_number: u8,

    /// 1-based monitor index to capture.
    #[serde(default = "monitor_default")]
    pub monitor_index: usize,

    /// Seconds between runs in loop mode; `None` runs once.
    #[serde(default)]
    pub interval_secs: Option<u64>,

    /// Upload target; `None` disables uploading entirely.
    #[serde(default)]
    pub upload: Option<UploadConfig>,
}

fn monitor_default() -> usize {
    1
}

impl CaptureConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            error: e,
            path: path.display().to_string(),
        })?;

        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.display().to_string(),
        })
    }

    /// Checks every boundary invariant once, before the pipeline runs.
    ///
    /// `monitor_count` is the number of currently enumerated displays.
    pub fn validate(&self, monitor_count: usize) -> Result<(), ConfigError> {
        if !(MIN_NODE_NUMBER..=MAX_NODE_NUMBER).contains(&self.node_number) {
            return Err(ConfigError::NodeNumber(self.node_number));
        }

        if self.monitor_index == 0 || self.monitor_index > monitor_count {
            return Err(ConfigError::MonitorIndex {
                index: self.monitor_index,
                count: monitor_count,
            });
        }

        if !self.save_dir.is_dir() {
            return Err(ConfigError::SaveDir(self.save_dir.display().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config(save_dir: PathBuf) -> CaptureConfig {
        CaptureConfig {
            save_dir,
            node_number: 7,
            monitor_index: 1,
            interval_secs: None,
            upload: None,
        }
    }

    #[test]
    fn test_validate_accepts_good_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = valid_config(tmp.path().to_path_buf());

        assert!(config.validate(2).is_ok());
    }

    #[test]
    fn test_validate_rejects_node_number_bounds() {
        let tmp = tempfile::tempdir().unwrap();

        let mut config = valid_config(tmp.path().to_path_buf());
        config.node_number = 0;
        assert!(matches!(config.validate(1), Err(ConfigError::NodeNumber(0))));

        config.node_number = 100;
        assert!(matches!(
            config.validate(1),
            Err(ConfigError::NodeNumber(100))
        ));
    }

    #[test]
    fn test_validate_rejects_monitor_index() {
        let tmp = tempfile::tempdir().unwrap();

        let mut config = valid_config(tmp.path().to_path_buf());
        config.monitor_index = 0;
        assert!(matches!(
            config.validate(2),
            Err(ConfigError::MonitorIndex { index: 0, count: 2 })
        ));

        config.monitor_index = 3;
        assert!(matches!(
            config.validate(2),
            Err(ConfigError::MonitorIndex { index: 3, count: 2 })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_save_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = valid_config(tmp.path().join("missing"));

        assert!(matches!(config.validate(1), Err(ConfigError::SaveDir(_))));
    }

    #[test]
    fn test_load_from_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("orus.toml");
        fs::write(
            &path,
            r#"
save_dir = "/var/lib/orus"
node_number = 7
monitor_index = 2
interval_secs = 10

[upload]
endpoint = "http://storage.local:9000"
"#,
        )
        .unwrap();

        let config = CaptureConfig::load(&path).unwrap();

        assert_eq!(config.save_dir, PathBuf::from("/var/lib/orus"));
        assert_eq!(config.node_number, 7);
        assert_eq!(config.monitor_index, 2);
        assert_eq!(config.interval_secs, Some(10));

        let upload = config.upload.unwrap();
        assert_eq!(upload.endpoint, "http://storage.local:9000");
        assert_eq!(upload.bucket, DEFAULT_BUCKET);
    }

    #[test]
    fn test_load_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("orus.toml");
        fs::write(&path, "save_dir = \"/var/lib/orus\"\nnode_number = 1\n").unwrap();

        let config = CaptureConfig::load(&path).unwrap();

        assert_eq!(config.monitor_index, 1);
        assert_eq!(config.interval_secs, None);
        assert!(config.upload.is_none());
    }
}
