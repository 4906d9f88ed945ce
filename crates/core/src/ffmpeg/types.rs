//! Types for the ffmpeg module.

use serde::{Deserialize, Serialize};

/// Names that route a sink to the local output device instead of a path.
pub const DEVICE_ALIASES: [&str; 4] = ["speakers", "speaker", "local", "default"];

/// A media item as seen by the support checker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Container format, e.g. `wav` or `mp3`.
    #[serde(default)]
    pub format: Option<String>,
    /// Audio codec, e.g. `pcm_s16le` or `mp3`.
    #[serde(default)]
    pub codec: Option<String>,
    /// Where the track lives; only used for logging.
    pub uri: String,
}

impl TrackDescriptor {
    /// Creates a descriptor with both format and codec known.
    pub fn new(
        uri: impl Into<String>,
        format: impl Into<String>,
        codec: impl Into<String>,
    ) -> Self {
        Self {
            format: Some(format.into()),
            codec: Some(codec.into()),
            uri: uri.into(),
        }
    }
}

/// Result of a support check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Support {
    /// Both format and codec are decodable.
    Supported,
    /// The format or the codec is missing from the probed capabilities.
    Unsupported,
    /// The track did not say which format or codec it uses.
    Unknown,
}

impl Support {
    /// `Some(true)`/`Some(false)` for a definite answer, `None` for unknown.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Supported => Some(true),
            Self::Unsupported => Some(false),
            Self::Unknown => None,
        }
    }

    /// Lowercase name, as used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Unsupported => "unsupported",
            Self::Unknown => "unknown",
        }
    }
}

/// How one side of an invocation should be interpreted or produced.
///
/// A bare string converts into a spec with only the format set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamSpec {
    /// Container format (`-f`).
    #[serde(default)]
    pub format: Option<String>,
    /// Audio codec (`-codec:a`).
    #[serde(default)]
    pub codec: Option<String>,
    /// Offset in seconds to discard from the decoded stream.
    #[serde(default)]
    pub seek: Option<f64>,
}

impl StreamSpec {
    /// Spec with only a format.
    pub fn format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Default::default()
        }
    }

    /// Sets the codec.
    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }

    /// Sets the seek offset in seconds.
    pub fn with_seek(mut self, seek: f64) -> Self {
        self.seek = Some(seek);
        self
    }

    /// The format, unless missing or empty.
    pub fn format_name(&self) -> Option<&str> {
        non_empty(self.format.as_deref())
    }

    /// The codec, unless missing or empty.
    pub fn codec_name(&self) -> Option<&str> {
        non_empty(self.codec.as_deref())
    }

    /// Builds a spec from optional parts, `None` if all are absent.
    pub fn from_parts(format: Option<String>, codec: Option<String>) -> Option<Self> {
        if format.is_none() && codec.is_none() {
            return None;
        }
        Some(Self {
            format,
            codec,
            seek: None,
        })
    }
}

/// Empty strings count as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl From<&str> for StreamSpec {
    fn from(format: &str) -> Self {
        Self::format(format)
    }
}

impl From<String> for StreamSpec {
    fn from(format: String) -> Self {
        Self::format(format)
    }
}

/// Where a sink writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The local audio output device.
    Device,
    /// A file, named pipe or ffmpeg output URL (`-` for stdout).
    Path(String),
}

impl Destination {
    /// Maps the device aliases to [`Destination::Device`], anything else to a path.
    pub fn parse(dest: &str) -> Self {
        if DEVICE_ALIASES.contains(&dest) {
            Self::Device
        } else {
            Self::Path(dest.to_string())
        }
    }

    /// Whether output goes to our own stdout (`-`).
    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Path(dest) if dest == "-")
    }
}

impl From<&str> for Destination {
    fn from(dest: &str) -> Self {
        Self::parse(dest)
    }
}

/// Everything a sink invocation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkRequest {
    /// Input location passed to `-i` (`-` reads from stdin).
    pub location: String,
    /// How to interpret the input.
    pub input: Option<StreamSpec>,
    /// Where to write.
    pub destination: Destination,
    /// Seconds to discard after decoding; overrides `input.seek`.
    pub seek: Option<f64>,
    /// How to encode the output.
    pub output: Option<StreamSpec>,
}

impl SinkRequest {
    /// Creates a request with no format hints and no seek.
    pub fn new(location: impl Into<String>, destination: impl Into<Destination>) -> Self {
        Self {
            location: location.into(),
            input: None,
            destination: destination.into(),
            seek: None,
            output: None,
        }
    }

    /// Sets the input spec.
    pub fn with_input(mut self, input: impl Into<StreamSpec>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the seek offset in seconds.
    pub fn with_seek(mut self, seek: f64) -> Self {
        self.seek = Some(seek);
        self
    }

    /// Sets the output spec.
    pub fn with_output(mut self, output: impl Into<StreamSpec>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Seek to apply: the explicit one, else the input spec's.
    pub fn effective_seek(&self) -> Option<f64> {
        self.seek
            .or_else(|| self.input.as_ref().and_then(|input| input.seek))
    }
}
