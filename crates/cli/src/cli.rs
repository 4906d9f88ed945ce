use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ffpipe_core::StreamSpec;

#[derive(Parser)]
#[command(name = "ffpipe")]
#[command(author, version, about = "Stream audio through ffmpeg")]
pub struct Cli {
    /// Path to config file (defaults plus FFPIPE_* environment otherwise)
    #[arg(short, long, global = true, env = "FFPIPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the formats and codecs the local ffmpeg can decode
    Capabilities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a track's format and codec can be played
    Check {
        /// Container format of the track
        #[arg(long)]
        format: Option<String>,

        /// Audio codec of the track
        #[arg(long)]
        codec: Option<String>,

        /// Location of the track, for log messages
        #[arg(default_value = "-")]
        uri: String,
    },

    /// Decode a local file or remote URL and write the stream to stdout
    Source {
        /// File path or URL to read
        location: String,

        #[command(flatten)]
        input: InputArgs,

        /// Seconds to skip from the start
        #[arg(long)]
        seek: Option<f64>,
    },

    /// Play or write a stream to a device, file or named pipe
    Sink {
        /// Input location (`-` reads from stdin)
        location: String,

        /// `speakers`, `speaker`, `local`, `default`, or a path
        destination: String,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Seconds to skip from the start
        #[arg(long)]
        seek: Option<f64>,
    },

    /// Recode stdin to stdout
    Transform {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check that the ffmpeg binary is available
    CheckTools,
}

#[derive(Args)]
pub struct InputArgs {
    /// Input container format (ffmpeg guesses when omitted)
    #[arg(id = "input_format", long = "input-format", short = 'f')]
    pub format: Option<String>,

    /// Input audio codec
    #[arg(id = "input_codec", long = "input-codec")]
    pub codec: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Output container format
    #[arg(id = "output_format", long = "output-format", short = 'F')]
    pub format: Option<String>,

    /// Output audio codec
    #[arg(id = "output_codec", long = "output-codec")]
    pub codec: Option<String>,
}

impl InputArgs {
    pub fn spec(&self) -> Option<StreamSpec> {
        StreamSpec::from_parts(self.format.clone(), self.codec.clone())
    }
}

impl OutputArgs {
    pub fn spec(&self) -> Option<StreamSpec> {
        StreamSpec::from_parts(self.format.clone(), self.codec.clone())
    }
}
