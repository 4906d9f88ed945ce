use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
}

/// External ffmpeg binary configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FfmpegConfig {
    /// Path to the ffmpeg binary (looked up on PATH when bare)
    #[serde(default = "default_ffmpeg_path")]
    pub path: PathBuf,
    /// Output format for the local device route when none is requested
    #[serde(default = "default_device_format")]
    pub device_format: String,
    /// Output device written by the local device route
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            path: default_ffmpeg_path(),
            device_format: default_device_format(),
            device_name: default_device_name(),
        }
    }
}

impl FfmpegConfig {
    /// Creates a config pointing at a specific ffmpeg binary.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Sets the output format and device used by the local device route.
    pub fn with_device(mut self, format: impl Into<String>, name: impl Into<String>) -> Self {
        self.device_format = format.into();
        self.device_name = name.into();
        self
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_device_format() -> String {
    "alsa".to_string()
}

fn default_device_name() -> String {
    "default".to_string()
}
