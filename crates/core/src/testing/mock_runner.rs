//! Mock command runner for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ffmpeg::{CapabilityKind, CommandRunner, FfmpegError};

/// Mock implementation of the CommandRunner trait.
///
/// Returns canned stdout keyed by the joined argument list, records every
/// invocation, and can be switched to fail as if ffmpeg were missing.
/// Unknown invocations print nothing.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    /// Canned stdout by joined arguments.
    outputs: Arc<RwLock<HashMap<String, String>>>,
    /// Recorded argument lists.
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    /// Whether every invocation fails.
    failing: Arc<RwLock<bool>>,
}

impl MockRunner {
    /// Create a runner that prints nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that answers `-formats` and `-codecs`.
    pub fn with_listings(formats: &str, codecs: &str) -> Self {
        let outputs = HashMap::from([
            (
                CapabilityKind::Formats.flag().to_string(),
                formats.to_string(),
            ),
            (CapabilityKind::Codecs.flag().to_string(), codecs.to_string()),
        ]);
        Self {
            outputs: Arc::new(RwLock::new(outputs)),
            ..Default::default()
        }
    }

    /// Create a runner whose every invocation fails.
    pub fn failing() -> Self {
        Self {
            failing: Arc::new(RwLock::new(true)),
            ..Default::default()
        }
    }

    /// Set the stdout for an argument list.
    pub async fn set_output(&self, args: &[&str], stdout: impl Into<String>) {
        self.outputs
            .write()
            .await
            .insert(args.join(" "), stdout.into());
    }

    /// Make subsequent invocations fail or succeed.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Get all recorded invocations.
    pub async fn recorded_invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: &[String]) -> Result<String, FfmpegError> {
        self.invocations.write().await.push(args.to_vec());

        if *self.failing.read().await {
            return Err(FfmpegError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            });
        }

        Ok(self
            .outputs
            .read()
            .await
            .get(&args.join(" "))
            .cloned()
            .unwrap_or_default())
    }
}
