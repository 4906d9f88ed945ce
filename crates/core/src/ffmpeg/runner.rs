//! Synchronous-style invocations of the ffmpeg binary.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::FfmpegError;

/// Runs the external tool to completion and hands back its standard output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns the name of the wrapped program.
    fn name(&self) -> &str;

    /// Runs the program with `args` and returns its captured stdout.
    async fn run(&self, args: &[String]) -> Result<String, FfmpegError>;
}

/// The real ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegBinary {
    path: PathBuf,
}

impl FfmpegBinary {
    /// Wraps the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the wrapped binary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates that the binary exists and runs.
    pub async fn validate(&self) -> Result<(), FfmpegError> {
        let version = self.run(&["-version".to_string()]).await?;
        if let Some(first) = version.lines().next() {
            debug!("{}", first);
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRunner for FfmpegBinary {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run(&self, args: &[String]) -> Result<String, FfmpegError> {
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FfmpegError::FfmpegNotFound {
                        path: self.path.clone(),
                    }
                } else {
                    FfmpegError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FfmpegError::CommandFailed {
                program: self.path.display().to_string(),
                code: output.status.code(),
                stderr: if stderr.is_empty() { None } else { Some(stderr) },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
