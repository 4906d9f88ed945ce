//! Testing utilities and test doubles.
//!
//! `MockRunner` stands in for the ffmpeg binary during capability probing,
//! and `fixtures` pins literal listings in the layout ffmpeg prints them.
//!
//! # Example
//!
//! ```rust,ignore
//! use ffpipe_core::testing::{fixtures, MockRunner};
//! use ffpipe_core::ffmpeg::probe_capabilities;
//!
//! let runner = MockRunner::with_listings(fixtures::FORMATS_LISTING, fixtures::CODECS_LISTING);
//! let capabilities = probe_capabilities(&runner).await?;
//! assert!(capabilities.supports_codec("flac"));
//! ```

#[cfg(test)]
mod log_capture;
mod mock_runner;

#[cfg(test)]
pub(crate) use log_capture::CapturedLogs;
pub use mock_runner::MockRunner;

/// Captured `ffmpeg -formats` / `ffmpeg -codecs` output.
pub mod fixtures {
    /// `ffmpeg -formats`, trimmed to a handful of rows.
    pub const FORMATS_LISTING: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 D  aac             raw ADTS AAC (Advanced Audio Coding)
 DE alsa            ALSA audio output
 DE flac            raw FLAC
  E ipod            iPod H.264 MP4 (MPEG-4 Part 14)
 D  mov,mp4,m4a,3gp,3g2,mj2 QuickTime / MOV
 DE mp3             MP3 (MPEG audio layer 3)
 DE ogg             Ogg

 DE wav             WAV / WAVE (Waveform Audio)
";

    /// `ffmpeg -codecs`, trimmed to a handful of rows.
    pub const CODECS_LISTING: &str = "\
Codecs:
 D..... = Decoding supported
 .E.... = Encoding supported
 ..V... = Video codec
 ..A... = Audio codec
 ..S... = Subtitle codec
 ...I.. = Intra frame-only codec
 ....L. = Lossy compression
 .....S = Lossless compression
 -------
 .EV.L. a64_multi            Multicolor charset for Commodore 64 (encoders: a64multi )
 DEA.L. aac                  AAC (Advanced Audio Coding) (decoders: aac aac_fixed )
 DES... ass                  ASS (Advanced SSA) subtitle (decoders: ssa ass ) (encoders: ssa ass )
 DEA..S flac                 FLAC (Free Lossless Audio Codec)
 DEV.LS h264                 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10
 DEA.L. mp3                  MP3 (MPEG audio layer 3) (decoders: mp3float mp3 ) (encoders: libmp3lame )
 DEA.L. opus                 Opus (Opus Interactive Audio Codec) (decoders: opus libopus )
 DEA..S pcm_s16le            PCM signed 16-bit little-endian
 DEA.L. vorbis               Vorbis (decoders: vorbis libvorbis ) (encoders: vorbis libvorbis )
";
}
