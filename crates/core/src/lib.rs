pub mod config;
pub mod ffmpeg;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
    FfmpegConfig,
};
pub use ffmpeg::{
    probe_capabilities, CapabilitySet, Destination, FfmpegBinary, FfmpegError, FfmpegPipe,
    ProcessHandle, SinkRequest, StreamSpec, Support, TrackDescriptor,
};
