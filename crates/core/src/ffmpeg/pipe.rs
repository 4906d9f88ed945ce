//! Public operations: probe-backed support checks plus the three stream shapes.

use std::sync::Arc;
use tracing::{info_span, Span};

use super::args::{input_args, output_args, seek_args, with_baseline};
use super::capabilities::CapabilitySet;
use super::error::FfmpegError;
use super::process::{spawn, ProcessHandle};
use super::types::{Destination, SinkRequest, StreamSpec, Support, TrackDescriptor};
use crate::config::FfmpegConfig;

/// Entry point for driving ffmpeg as an audio stream source, sink or filter.
#[derive(Debug, Clone)]
pub struct FfmpegPipe {
    config: FfmpegConfig,
    capabilities: Arc<CapabilitySet>,
}

impl FfmpegPipe {
    /// Creates the operations object from config and probed capabilities.
    pub fn new(config: FfmpegConfig, capabilities: CapabilitySet) -> Self {
        Self {
            config,
            capabilities: Arc::new(capabilities),
        }
    }

    pub fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Checks a track against the probed capabilities.
    pub fn is_supported(&self, track: &TrackDescriptor) -> Support {
        self.capabilities.check(track)
    }

    /// Arguments for reading `location` (a path or URL) into stdout.
    pub fn source_args(
        &self,
        location: &str,
        input: Option<&StreamSpec>,
    ) -> Result<Vec<String>, FfmpegError> {
        if location.is_empty() {
            return Err(FfmpegError::invalid_request("input location is empty"));
        }

        let mut args = input_args(input);
        args.extend(["-i".to_string(), location.to_string()]);
        args.extend(seek_args(input.and_then(|spec| spec.seek)));
        Ok(args)
    }

    /// Produces a readable stream from a local file or remote URL.
    ///
    /// Without an input format ffmpeg guesses from the content.
    pub fn source(
        &self,
        location: &str,
        input: Option<&StreamSpec>,
        log: Option<&Span>,
    ) -> Result<ProcessHandle, FfmpegError> {
        let args = self.source_args(location, input)?;
        self.launch("source", args, log)
    }

    /// Arguments for consuming a stream into a device, file or pipe.
    pub fn sink_args(&self, request: &SinkRequest) -> Result<Vec<String>, FfmpegError> {
        if request.location.is_empty() {
            return Err(FfmpegError::invalid_request("input location is empty"));
        }

        let mut args = input_args(request.input.as_ref());
        args.extend(["-i".to_string(), request.location.clone()]);
        args.extend(seek_args(request.effective_seek()));

        match &request.destination {
            Destination::Device => {
                let format = request
                    .output
                    .as_ref()
                    .and_then(StreamSpec::format_name)
                    .unwrap_or(self.config.device_format.as_str());
                args.extend([
                    "-f".to_string(),
                    format.to_string(),
                    self.config.device_name.clone(),
                ]);
            }
            Destination::Path(dest) => {
                if dest.is_empty() {
                    return Err(FfmpegError::invalid_request("sink destination is empty"));
                }
                args.extend(output_args(request.output.as_ref()));
                args.push(dest.clone());
            }
        }

        Ok(args)
    }

    /// Consumes a stream, writing it to the local output device or to a
    /// file or named pipe.
    pub fn sink(
        &self,
        request: &SinkRequest,
        log: Option<&Span>,
    ) -> Result<ProcessHandle, FfmpegError> {
        let args = self.sink_args(request)?;
        self.launch("sink", args, log)
    }

    /// Arguments for recoding stdin into stdout.
    pub fn transform_args(&self, input: &StreamSpec, output: &StreamSpec) -> Vec<String> {
        let mut args = input_args(Some(input));
        args.extend(["-i".to_string(), "-".to_string()]);
        args.extend(output_args(Some(output)));
        args.push("-".to_string());
        args
    }

    /// Pipes a stream through ffmpeg: write to the handle's stdin, read the
    /// recoded stream from the handle.
    pub fn transform(
        &self,
        input: &StreamSpec,
        output: &StreamSpec,
        log: Option<&Span>,
    ) -> Result<ProcessHandle, FfmpegError> {
        let args = self.transform_args(input, output);
        self.launch("transform", args, log)
    }

    fn launch(
        &self,
        operation: &str,
        args: Vec<String>,
        log: Option<&Span>,
    ) -> Result<ProcessHandle, FfmpegError> {
        let span = log.cloned().unwrap_or_else(|| info_span!("ffmpeg"));
        spawn(&self.config.path, with_baseline(args), operation, span)
    }
}
