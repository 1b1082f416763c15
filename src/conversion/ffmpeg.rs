//! FFmpeg subprocess handling for audio conversion

use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of a file conversion
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Path to the converted output file
    pub output_path: PathBuf,
    /// Original input file path
    pub input_path: PathBuf,
    /// Whether conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
}

impl ConversionResult {
    fn failure(input_path: &Path, output_path: &Path, error: String) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            input_path: input_path.to_path_buf(),
            success: false,
            error: Some(error),
        }
    }
}

/// Convert a single M4A file to MP3 using ffmpeg
///
/// Runs synchronously and blocks until ffmpeg exits. The transcoder is
/// asked to copy container-level metadata itself (`-map_metadata 0`) and to
/// write ID3v2.3 tags so the metadata reconciliation step can read them
/// back. Success requires a zero exit status and a non-empty output file.
///
/// # Arguments
/// * `ffmpeg` - Path to the ffmpeg binary
/// * `input_path` - Path to the input M4A file
/// * `output_path` - Path for the output MP3 file (overwritten if present)
/// * `bitrate_bps` - Target bitrate in bits/second (e.g., 256000)
pub fn transcode_file(
    ffmpeg: &Path,
    input_path: &Path,
    output_path: &Path,
    bitrate_bps: u32,
) -> ConversionResult {
    let result = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input_path)
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg(bitrate_bps.to_string())
        .arg("-map_metadata")
        .arg("0")
        .arg("-id3v2_version")
        .arg("3")
        .arg(output_path)
        .output();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            return ConversionResult::failure(
                input_path,
                output_path,
                format!("Failed to spawn ffmpeg: {}", e),
            );
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return ConversionResult::failure(
            input_path,
            output_path,
            format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("Unknown error")
            ),
        );
    }

    // A zero exit is not enough: trust the output file only if it exists
    // and has content.
    match std::fs::metadata(output_path) {
        Ok(metadata) if metadata.len() > 0 => ConversionResult {
            output_path: output_path.to_path_buf(),
            input_path: input_path.to_path_buf(),
            success: true,
            error: None,
        },
        Ok(_) => ConversionResult::failure(
            input_path,
            output_path,
            format!("ffmpeg produced an empty file at {}", output_path.display()),
        ),
        Err(e) => ConversionResult::failure(
            input_path,
            output_path,
            format!("Output file missing at {}: {}", output_path.display(), e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_with_missing_ffmpeg() {
        let result = transcode_file(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("/music/song.m4a"),
            Path::new("/music/song.mp3"),
            320_000,
        );

        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(result.input_path, PathBuf::from("/music/song.m4a"));
        assert_eq!(result.output_path, PathBuf::from("/music/song.mp3"));
    }

    #[test]
    fn test_conversion_result_creation() {
        let result = ConversionResult {
            output_path: PathBuf::from("/tmp/test.mp3"),
            input_path: PathBuf::from("/home/user/song.m4a"),
            success: true,
            error: None,
        };

        assert!(result.success);
        assert!(result.error.is_none());
    }
}
