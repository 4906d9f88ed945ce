//! Error types for the ffmpeg module.

use std::path::PathBuf;
use thiserror::Error;

use super::capabilities::CapabilityKind;

/// Errors that can occur while probing or driving ffmpeg.
#[derive(Debug, Error)]
pub enum FfmpegError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// A synchronous invocation exited unsuccessfully.
    #[error("{program} exited with code {code:?}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The capability listing could not be obtained.
    #[error("Failed to determine supported {kind}: {reason}")]
    ProbeFailed { kind: CapabilityKind, reason: String },

    /// The capability listing was obtained but held no usable rows.
    #[error("No supported {kind} found")]
    NoCapabilities { kind: CapabilityKind },

    /// The caller passed an argument that cannot be turned into an invocation.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A spawned process failed before or while streaming.
    #[error("{label} failed (exit code {code:?})")]
    ProcessFailed {
        label: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// I/O error while talking to the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FfmpegError {
    /// Creates a new probe failed error.
    pub fn probe_failed(kind: CapabilityKind, reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            kind,
            reason: reason.into(),
        }
    }

    /// Creates a new invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates a process failure from collected stderr lines.
    pub fn process_failed(label: impl Into<String>, code: Option<i32>, stderr: &[String]) -> Self {
        Self::ProcessFailed {
            label: label.into(),
            code,
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr.join("\n"))
            },
        }
    }

    /// Captured diagnostic output, if the failure carries any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } | Self::ProcessFailed { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProcessFailed { .. } | Self::Io(_))
    }
}
