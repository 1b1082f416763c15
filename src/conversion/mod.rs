//! Audio conversion module
//!
//! Handles transcoding M4A files to MP3 using ffmpeg, plus resolution of
//! the external ffmpeg/ffprobe binaries.

mod ffmpeg;

pub use ffmpeg::{transcode_file, ConversionResult};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Resolved paths to the external tools, determined once at startup
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolve tool locations from the environment
    ///
    /// `FFMPEG_PATH` / `FFPROBE_PATH` override explicitly; otherwise the
    /// bare command names are used and the OS resolves them through PATH.
    pub fn resolve() -> Self {
        Self {
            ffmpeg: resolve_tool(std::env::var_os("FFMPEG_PATH"), "ffmpeg"),
            ffprobe: resolve_tool(std::env::var_os("FFPROBE_PATH"), "ffprobe"),
        }
    }
}

fn resolve_tool(override_path: Option<OsString>, default_name: &str) -> PathBuf {
    match override_path {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(default_name),
    }
}

/// Verify that ffmpeg and ffprobe can be executed
///
/// Runs `<tool> -version` for both binaries. Called before any conversion
/// starts so a missing tool fails the run up front instead of per file.
pub fn verify_tools(tools: &ToolPaths) -> Result<(), String> {
    verify_tool(&tools.ffmpeg, "ffmpeg")?;
    verify_tool(&tools.ffprobe, "ffprobe")?;
    Ok(())
}

fn verify_tool(path: &Path, name: &str) -> Result<(), String> {
    let status = Command::new(path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| format!("{} not found at {}: {}", name, path.display(), e))?;

    if !status.success() {
        return Err(format!(
            "{} at {} exited with status {}",
            name,
            path.display(),
            status
        ));
    }

    log::debug!("{} verified at: {}", name, path.display());
    Ok(())
}
