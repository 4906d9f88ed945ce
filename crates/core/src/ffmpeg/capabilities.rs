//! Decode capability detection from ffmpeg's `-formats` and `-codecs` listings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{error, info, warn};

use super::error::FfmpegError;
use super::runner::CommandRunner;
use super::types::{non_empty, Support, TrackDescriptor};

/// Which capability listing to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Container formats (`-formats`).
    Formats,
    /// Codecs (`-codecs`).
    Codecs,
}

impl CapabilityKind {
    /// The listing flag passed to ffmpeg.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Formats => "-formats",
            Self::Codecs => "-codecs",
        }
    }

    /// Whether a row's flag field marks something we can decode.
    ///
    /// Formats: exactly `D` or `DE`. Codecs: a field of at least six
    /// flags with `D` first and `A` third (decodable audio).
    fn accepts(self, flags: &str) -> bool {
        match self {
            Self::Formats => flags == "D" || flags == "DE",
            Self::Codecs => {
                let flags = flags.as_bytes();
                flags.len() >= 6 && flags[0] == b'D' && flags[2] == b'A'
            }
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formats => write!(f, "formats"),
            Self::Codecs => write!(f, "codecs"),
        }
    }
}

/// Parses a capability listing into the names it marks as decodable.
///
/// Phase one drops blank lines and everything up to and including the
/// first line starting with `--`. Phase two splits each remaining row on
/// whitespace into a flag field and a comma separated name list.
pub fn parse_listing(kind: CapabilityKind, output: &str) -> Vec<String> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());

    if !lines.by_ref().any(|line| line.trim().starts_with("--")) {
        return Vec::new();
    }

    lines
        .filter_map(|line| parse_row(kind, line))
        .flat_map(|names| names.split(','))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_row(kind: CapabilityKind, line: &str) -> Option<&str> {
    let mut fields = line.split_whitespace();
    let flags = fields.next()?;
    if !kind.accepts(flags) {
        return None;
    }

    let names = fields.next()?;
    let end = names
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ','))
        .unwrap_or(names.len());
    let names = &names[..end];
    (!names.is_empty()).then_some(names)
}

/// Decodable formats and codecs reported by the local ffmpeg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    formats: BTreeSet<String>,
    codecs: BTreeSet<String>,
}

impl CapabilitySet {
    /// Builds a set from already probed names.
    pub fn new(
        formats: impl IntoIterator<Item = String>,
        codecs: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            formats: formats.into_iter().collect(),
            codecs: codecs.into_iter().collect(),
        }
    }

    /// A set that supports nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing at all is supported.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty() && self.codecs.is_empty()
    }

    pub fn supports_format(&self, format: &str) -> bool {
        self.formats.contains(format)
    }

    pub fn supports_codec(&self, codec: &str) -> bool {
        self.codecs.contains(codec)
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(String::as_str)
    }

    pub fn codecs(&self) -> impl Iterator<Item = &str> {
        self.codecs.iter().map(String::as_str)
    }

    /// Checks whether a track's format and codec can both be decoded.
    ///
    /// Returns [`Support::Unknown`] when the track does not name both.
    pub fn check(&self, track: &TrackDescriptor) -> Support {
        let format = non_empty(track.format.as_deref());
        let codec = non_empty(track.codec.as_deref());
        let (Some(format), Some(codec)) = (format, codec) else {
            return Support::Unknown;
        };

        if !self.supports_format(format) {
            warn!(uri = %track.uri, codec, "Unsupported format: {}", format);
            return Support::Unsupported;
        }

        if !self.supports_codec(codec) {
            warn!(uri = %track.uri, format, "Unsupported codec: {}", codec);
            return Support::Unsupported;
        }

        info!(
            "Format ({}) and codec ({}) of {} are supported",
            format, codec, track.uri
        );
        Support::Supported
    }
}

async fn try_probe<R>(runner: &R, kind: CapabilityKind) -> Result<Vec<String>, FfmpegError>
where
    R: CommandRunner + ?Sized,
{
    let stdout = runner
        .run(&[kind.flag().to_string()])
        .await
        .map_err(|e| FfmpegError::probe_failed(kind, e.to_string()))?;

    let names = parse_listing(kind, &stdout);
    if names.is_empty() {
        return Err(FfmpegError::NoCapabilities { kind });
    }
    Ok(names)
}

fn log_probe_failure(err: &FfmpegError) {
    error!("{}", err);
    if matches!(err, FfmpegError::ProbeFailed { .. }) {
        warn!("YOU WILL NOT BE ABLE TO PLAY ANYTHING");
    }
}

/// Lists the decodable names of one kind. Never fails: problems are logged
/// and yield an empty list.
pub async fn probe<R>(runner: &R, kind: CapabilityKind) -> Vec<String>
where
    R: CommandRunner + ?Sized,
{
    match try_probe(runner, kind).await {
        Ok(names) => {
            info!("Found {} supported {}", names.len(), kind);
            names
        }
        Err(e) => {
            log_probe_failure(&e);
            Vec::new()
        }
    }
}

/// Probes formats and codecs once, at startup.
///
/// If ffmpeg cannot be invoked the result is an empty set, so every support
/// check answers "unsupported". If it runs but reports nothing decodable,
/// that is fatal and returned as [`FfmpegError::NoCapabilities`].
pub async fn probe_capabilities<R>(runner: &R) -> Result<CapabilitySet, FfmpegError>
where
    R: CommandRunner + ?Sized,
{
    let mut lists = Vec::with_capacity(2);
    for kind in [CapabilityKind::Formats, CapabilityKind::Codecs] {
        match try_probe(runner, kind).await {
            Ok(names) => {
                info!("Found {} supported {}", names.len(), kind);
                lists.push(names);
            }
            Err(e @ FfmpegError::NoCapabilities { .. }) => {
                error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                log_probe_failure(&e);
                lists.push(Vec::new());
            }
        }
    }

    let codecs = lists.pop().unwrap_or_default();
    let formats = lists.pop().unwrap_or_default();
    Ok(CapabilitySet::new(formats, codecs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, CapturedLogs, MockRunner};

    #[test]
    fn test_parse_formats_listing() {
        let formats = parse_listing(CapabilityKind::Formats, fixtures::FORMATS_LISTING);
        assert_eq!(
            formats,
            vec![
                "aac", "alsa", "flac", "mov", "mp4", "m4a", "3gp", "3g2", "mj2", "mp3", "ogg",
                "wav"
            ]
        );
        // mux-only rows are not decodable
        assert!(!formats.contains(&"ipod".to_string()));
    }

    #[test]
    fn test_parse_codecs_listing() {
        let codecs = parse_listing(CapabilityKind::Codecs, fixtures::CODECS_LISTING);
        assert_eq!(
            codecs,
            vec!["aac", "flac", "mp3", "opus", "pcm_s16le", "vorbis"]
        );
        // video, encode-only and the legend above the separator are skipped
        assert!(!codecs.contains(&"h264".to_string()));
        assert!(!codecs.contains(&"a64_multi".to_string()));
        assert!(!codecs.contains(&"ass".to_string()));
        assert!(!codecs.contains(&"=".to_string()));
    }

    #[test]
    fn test_parse_codec_rows_need_audio_flag() {
        let listing = "Codecs:\n -------\n D.A.... mp3,mp2\n D..... none\n";
        let codecs = parse_listing(CapabilityKind::Codecs, listing);
        assert_eq!(codecs, vec!["mp3", "mp2"]);
    }

    #[test]
    fn test_parse_without_separator_is_empty() {
        let listing = " DE mp3             MP3 (MPEG audio layer 3)\n";
        assert!(parse_listing(CapabilityKind::Formats, listing).is_empty());
    }

    #[test]
    fn test_parse_separator_only_is_empty() {
        assert!(parse_listing(CapabilityKind::Formats, "File formats:\n --\n\n").is_empty());
        assert!(parse_listing(CapabilityKind::Codecs, "").is_empty());
    }

    #[test]
    fn test_parse_row_name_truncated_at_symbol() {
        let listing = " --\n DE matroska,webm   Matroska / WebM\n D  image2pipe|x    piped\n";
        let formats = parse_listing(CapabilityKind::Formats, listing);
        assert_eq!(formats, vec!["matroska", "webm", "image2pipe"]);
    }

    #[test]
    fn test_check_unknown_when_fields_missing() {
        let caps = CapabilitySet::new(vec!["wav".to_string()], vec!["pcm_s16le".to_string()]);
        let track = TrackDescriptor {
            format: Some("wav".to_string()),
            codec: None,
            uri: "file:///a.wav".to_string(),
        };
        assert_eq!(caps.check(&track), Support::Unknown);

        let track = TrackDescriptor {
            format: None,
            codec: Some("pcm_s16le".to_string()),
            uri: "file:///a.wav".to_string(),
        };
        assert_eq!(caps.check(&track), Support::Unknown);
    }

    #[test]
    fn test_check_unknown_when_fields_empty() {
        let caps = CapabilitySet::new(vec!["wav".to_string()], vec!["pcm_s16le".to_string()]);
        let track = TrackDescriptor {
            format: Some(String::new()),
            codec: Some("pcm_s16le".to_string()),
            uri: "file:///a.wav".to_string(),
        };
        assert_eq!(caps.check(&track), Support::Unknown);

        let track = TrackDescriptor::new("file:///a.wav", "wav", "");
        assert_eq!(caps.check(&track), Support::Unknown);
    }

    #[test]
    fn test_check_logs_verdict() {
        let (logs, _guard) = CapturedLogs::install();
        let caps = CapabilitySet::new(vec!["wav".to_string()], vec!["pcm_s16le".to_string()]);

        caps.check(&TrackDescriptor::new("a.ogg", "ogg", "vorbis"));
        assert!(logs.contains_line("WARN", "Unsupported format: ogg"));

        caps.check(&TrackDescriptor::new("a.wav", "wav", "vorbis"));
        assert!(logs.contains_line("WARN", "Unsupported codec: vorbis"));

        caps.check(&TrackDescriptor::new("a.wav", "wav", "pcm_s16le"));
        assert!(logs.contains_line("INFO", "Format (wav) and codec (pcm_s16le) of a.wav are supported"));
    }

    #[test]
    fn test_check_supported_and_unsupported() {
        let caps = CapabilitySet::new(
            vec!["wav".to_string(), "mp3".to_string()],
            vec!["pcm_s16le".to_string(), "mp3".to_string()],
        );
        assert_eq!(
            caps.check(&TrackDescriptor::new("a.mp3", "mp3", "mp3")),
            Support::Supported
        );
        assert_eq!(
            caps.check(&TrackDescriptor::new("a.ogg", "ogg", "vorbis")),
            Support::Unsupported
        );
        assert_eq!(
            caps.check(&TrackDescriptor::new("a.wav", "wav", "vorbis")),
            Support::Unsupported
        );
    }

    #[test]
    fn test_empty_set_fails_closed() {
        let caps = CapabilitySet::empty();
        assert!(caps.is_empty());
        assert_eq!(
            caps.check(&TrackDescriptor::new("a.wav", "wav", "pcm_s16le")),
            Support::Unsupported
        );
    }

    #[tokio::test]
    async fn test_probe_capabilities_from_listings() {
        let runner = MockRunner::with_listings(fixtures::FORMATS_LISTING, fixtures::CODECS_LISTING);
        let caps = probe_capabilities(&runner).await.unwrap();

        assert!(caps.supports_format("wav"));
        assert!(caps.supports_format("m4a"));
        assert!(caps.supports_codec("pcm_s16le"));
        assert!(!caps.supports_codec("h264"));
        assert_eq!(
            runner.recorded_invocations().await,
            vec![vec!["-formats".to_string()], vec!["-codecs".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_probe_capabilities_degrades_when_ffmpeg_fails() {
        let runner = MockRunner::failing();
        let caps = probe_capabilities(&runner).await.unwrap();
        assert!(caps.is_empty());
    }

    #[tokio::test]
    async fn test_probe_capabilities_fatal_when_nothing_found() {
        let runner = MockRunner::with_listings(fixtures::FORMATS_LISTING, "Codecs:\n -------\n");
        let result = probe_capabilities(&runner).await;
        assert!(matches!(
            result,
            Err(FfmpegError::NoCapabilities {
                kind: CapabilityKind::Codecs
            })
        ));
    }

    #[tokio::test]
    async fn test_listing_outcome_is_logged() {
        let (logs, _guard) = CapturedLogs::install();

        let runner = MockRunner::with_listings("File formats:\n --\n", "");
        assert!(probe(&runner, CapabilityKind::Formats).await.is_empty());
        assert!(logs.contains_line("ERROR", "No supported formats found"));
        assert_eq!(logs.count("YOU WILL NOT BE ABLE TO PLAY ANYTHING"), 0);

        let runner = MockRunner::failing();
        assert!(probe(&runner, CapabilityKind::Codecs).await.is_empty());
        assert!(logs.contains_line("ERROR", "Failed to determine supported codecs"));
        assert!(logs.contains_line("WARN", "YOU WILL NOT BE ABLE TO PLAY ANYTHING"));

        let runner = MockRunner::with_listings(fixtures::FORMATS_LISTING, "");
        probe(&runner, CapabilityKind::Formats).await;
        assert!(logs.contains_line("INFO", "Found 12 supported formats"));
    }

    #[tokio::test]
    async fn test_probe_never_fails() {
        let runner = MockRunner::failing();
        assert!(probe(&runner, CapabilityKind::Formats).await.is_empty());

        let runner = MockRunner::with_listings("File formats:\n --\n", "");
        assert!(probe(&runner, CapabilityKind::Formats).await.is_empty());

        let runner = MockRunner::with_listings(fixtures::FORMATS_LISTING, "");
        assert_eq!(probe(&runner, CapabilityKind::Formats).await.len(), 12);
    }
}
