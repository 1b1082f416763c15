//! Bitrate detection via ffprobe
//!
//! Asks ffprobe for the first audio stream's bit rate in JSON form and
//! parses the result. Every failure path resolves to the default bitrate
//! so the conversion pipeline never stalls on a probe problem.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

/// Fallback bitrate in bits/second when probing fails
pub const DEFAULT_BITRATE: u32 = 320_000;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    bit_rate: Option<serde_json::Value>,
}

/// Detect the audio bitrate of a file in bits/second
///
/// Runs ffprobe against the first audio stream. Any failure (ffprobe
/// missing, non-zero exit, malformed JSON, absent or non-numeric field)
/// logs a warning naming the file and returns [`DEFAULT_BITRATE`].
pub fn probe_bitrate(ffprobe: &Path, input: &Path) -> u32 {
    let output = Command::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("a:0")
        .arg("-show_entries")
        .arg("stream=bit_rate")
        .arg("-of")
        .arg("json")
        .arg(input)
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            log::warn!(
                "Could not run ffprobe for {}: {}. Using {} bps.",
                input.display(),
                e,
                DEFAULT_BITRATE
            );
            return DEFAULT_BITRATE;
        }
    };

    if !output.status.success() {
        log::warn!(
            "ffprobe exited with status {} for {}. Using {} bps.",
            output.status,
            input.display(),
            DEFAULT_BITRATE
        );
        return DEFAULT_BITRATE;
    }

    match parse_bitrate(&String::from_utf8_lossy(&output.stdout)) {
        Some(bitrate) => bitrate,
        None => {
            log::warn!(
                "Could not detect bitrate of {}. Using {} bps.",
                input.display(),
                DEFAULT_BITRATE
            );
            DEFAULT_BITRATE
        }
    }
}

/// Extract `streams[0].bit_rate` from ffprobe's JSON output
///
/// ffprobe reports the field as a string; a bare number is accepted too.
fn parse_bitrate(stdout: &str) -> Option<u32> {
    let info: FfprobeOutput = serde_json::from_str(stdout).ok()?;
    match info.streams.first()?.bit_rate.as_ref()? {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_bitrate_string_field() {
        let json = r#"{"programs": [], "streams": [{"bit_rate": "256000"}]}"#;
        assert_eq!(parse_bitrate(json), Some(256_000));
    }

    #[test]
    fn test_parse_bitrate_numeric_field() {
        let json = r#"{"streams": [{"bit_rate": 192000}]}"#;
        assert_eq!(parse_bitrate(json), Some(192_000));
    }

    #[test]
    fn test_parse_bitrate_missing_field() {
        let json = r#"{"streams": [{}]}"#;
        assert_eq!(parse_bitrate(json), None);
    }

    #[test]
    fn test_parse_bitrate_no_streams() {
        assert_eq!(parse_bitrate(r#"{"streams": []}"#), None);
        assert_eq!(parse_bitrate(r#"{}"#), None);
    }

    #[test]
    fn test_parse_bitrate_malformed_json() {
        assert_eq!(parse_bitrate("not json"), None);
        assert_eq!(parse_bitrate(""), None);
    }

    #[test]
    fn test_parse_bitrate_non_numeric_value() {
        let json = r#"{"streams": [{"bit_rate": "N/A"}]}"#;
        assert_eq!(parse_bitrate(json), None);
    }

    #[test]
    fn test_probe_missing_tool_returns_default() {
        let ffprobe = PathBuf::from("/nonexistent/ffprobe");
        let input = PathBuf::from("/music/song.m4a");
        assert_eq!(probe_bitrate(&ffprobe, &input), DEFAULT_BITRATE);
    }
}
