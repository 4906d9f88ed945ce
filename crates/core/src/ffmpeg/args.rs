//! Argument assembly for ffmpeg invocations.
//!
//! An invocation has the shape
//! `ffmpeg [global] {[input options] -i input} {[output options] output}`.
//! Every builder here is pure and returns a fresh vector.

use tracing::info;

use super::types::StreamSpec;

/// Prefix of every invocation: only errors on stderr, and skip video,
/// data and subtitle streams.
pub const BASELINE_ARGS: [&str; 5] = ["-loglevel", "error", "-vn", "-dn", "-sn"];

fn baseline() -> Vec<String> {
    BASELINE_ARGS.iter().map(|s| s.to_string()).collect()
}

fn push_stream_flags(args: &mut Vec<String>, spec: &StreamSpec) {
    if let Some(format) = spec.format_name() {
        args.extend(["-f".to_string(), format.to_string()]);
    }
    if let Some(codec) = spec.codec_name() {
        args.extend(["-codec:a".to_string(), codec.to_string()]);
    }
}

/// Baseline plus the flags describing how the input should be interpreted.
///
/// Without a format ffmpeg has to guess, which is noted in the log.
pub fn input_args(input: Option<&StreamSpec>) -> Vec<String> {
    let mut args = baseline();

    if input.and_then(StreamSpec::format_name).is_none() {
        info!("No incoming format info, ffmpeg will be forced to guess...");
    }

    if let Some(spec) = input {
        push_stream_flags(&mut args, spec);
    }

    args
}

/// Flags describing how the output should be produced, to be appended after
/// the input. Empty when there is no output spec.
pub fn output_args(output: Option<&StreamSpec>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(spec) = output {
        push_stream_flags(&mut args, spec);
    }
    args
}

/// `-ss <seconds>` for a finite positive offset, nothing otherwise.
///
/// Placed after `-i` so ffmpeg discards decoded frames: slower than an
/// input seek but precise, and quiet on stderr.
pub fn seek_args(seek: Option<f64>) -> Vec<String> {
    match seek {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => {
            vec!["-ss".to_string(), seconds.to_string()]
        }
        _ => Vec::new(),
    }
}

/// Prepends [`BASELINE_ARGS`] unless `args` already starts with them.
pub fn with_baseline(args: Vec<String>) -> Vec<String> {
    if args.len() >= BASELINE_ARGS.len()
        && args.iter().zip(BASELINE_ARGS).all(|(arg, base)| arg == base)
    {
        return args;
    }

    let mut full = baseline();
    full.extend(args);
    full
}

/// Renders arguments the way a POSIX shell would need them quoted.
pub fn args_to_string(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.bytes().all(|b| {
        matches!(b,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' |
            b'_' | b'-' | b'.' | b'/' | b':' | b'@' | b'%' | b',' | b'='
        )
    }) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r#"'"'"'"#))
}
