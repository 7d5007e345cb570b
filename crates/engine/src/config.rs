use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::thumbnails::ThumbnailSettings;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "trimmer.json";

const DEFAULT_MEDIA_PATH: &str = "sample.mp4";
const DEFAULT_TICK_INTERVAL_MS: u64 = 33;

/// Application settings. Every field is optional in the JSON file.
///
/// # Example
/// ```
/// use engine::TrimmerConfig;
///
/// let config: TrimmerConfig =
///     serde_json::from_str(r#"{ "thumbnails": { "count": 6 } }"#).unwrap();
/// assert_eq!(config.thumbnails.count, 6);
/// assert_eq!(config.thumbnails.width, 160);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimmerConfig {
    pub media_path: PathBuf,
    pub thumbnails: ThumbnailSettings,
    pub tick_interval_ms: u64,
}

impl Default for TrimmerConfig {
    fn default() -> Self {
        Self {
            media_path: PathBuf::from(DEFAULT_MEDIA_PATH),
            thumbnails: ThumbnailSettings::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl TrimmerConfig {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| EngineError::ConfigSerialization {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`TrimmerConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(EngineError::ConfigIo { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Playback clock tick period, at least one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
