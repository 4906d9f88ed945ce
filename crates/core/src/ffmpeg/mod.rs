//! FFmpeg module for streaming audio through an external ffmpeg binary.
//!
//! Decoding, muxing and resampling all happen inside ffmpeg; this module
//! decides which tracks ffmpeg can handle, assembles its command lines and
//! hands back the running process as a readable stream.
//!
//! # Features
//!
//! - Capability probing (`ffmpeg -formats`, `ffmpeg -codecs`) at startup
//! - Format/codec support checks for tracks
//! - `source`: read a local file or remote URL into a stream
//! - `sink`: write a stream to the local audio device, a file or a pipe
//! - `transform`: recode a piped stream on the fly
//!
//! # Example
//!
//! ```ignore
//! use ffpipe_core::ffmpeg::{probe_capabilities, FfmpegBinary, FfmpegPipe, StreamSpec};
//! use ffpipe_core::FfmpegConfig;
//!
//! let config = FfmpegConfig::default();
//! let capabilities = probe_capabilities(&FfmpegBinary::new(&config.path)).await?;
//! let pipe = FfmpegPipe::new(config, capabilities);
//!
//! // Decode a FLAC file into a WAV stream on stdout
//! let mut handle = pipe.source("/music/track.flac", Some(&"flac".into()), None)?;
//! handle.readable().await?;
//! tokio::io::copy(&mut handle, &mut tokio::io::stdout()).await?;
//! ```

mod args;
mod capabilities;
mod error;
mod pipe;
mod process;
mod runner;
mod types;

pub use args::{args_to_string, input_args, output_args, seek_args, with_baseline, BASELINE_ARGS};
pub use capabilities::{parse_listing, probe, probe_capabilities, CapabilityKind, CapabilitySet};
pub use error::FfmpegError;
pub use pipe::FfmpegPipe;
pub use process::ProcessHandle;
pub use runner::{CommandRunner, FfmpegBinary};
pub use types::{
    Destination, SinkRequest, StreamSpec, Support, TrackDescriptor, DEVICE_ALIASES,
};
