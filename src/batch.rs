//! Batch conversion driver
//!
//! Walks one directory (non-recursive), runs the probe → transcode →
//! reconcile pipeline for every `.m4a` file found, and reports progress on
//! the console. Files are processed strictly one at a time; a per-file
//! failure is logged and the batch moves on.

use std::path::{Path, PathBuf};

use crate::audio::{is_m4a_file, probe_bitrate, reconcile_metadata};
use crate::conversion::{transcode_file, ToolPaths};

/// Outcome counts for a finished batch
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Find all M4A files directly inside a directory
///
/// Subdirectories are not traversed. Results are sorted for a consistent
/// processing order.
pub fn find_m4a_files(folder: &Path) -> Result<Vec<PathBuf>, String> {
    if !folder.is_dir() {
        return Err(format!("Path is not a directory: {}", folder.display()));
    }

    let entries = std::fs::read_dir(folder)
        .map_err(|e| format!("Failed to read directory {}: {}", folder.display(), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_m4a_file(p))
        .collect();

    files.sort();
    Ok(files)
}

/// Derive the output path for an input file (same location, `.mp3` extension)
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension("mp3")
}

/// Convert every M4A file in a directory to MP3
///
/// Each file is probed for its source bitrate, transcoded, and then has its
/// metadata reconciled, to completion, before the next file starts. Returns
/// the converted/failed counts; individual failures never abort the batch.
pub fn convert_folder(tools: &ToolPaths, folder: &Path) -> Result<BatchSummary, String> {
    let files = find_m4a_files(folder)?;
    let mut summary = BatchSummary::default();

    for input in &files {
        let output = derive_output_path(input);
        let name = input
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());

        log::info!("Converting: {}", name);

        let bitrate = probe_bitrate(&tools.ffprobe, input);
        log::info!("Source bitrate: {} kbps", bitrate / 1000);

        let result = transcode_file(&tools.ffmpeg, input, &output, bitrate);
        if !result.success {
            log::error!(
                "Conversion failed for {}: {}",
                name,
                result.error.as_deref().unwrap_or("Unknown error")
            );
            summary.failed += 1;
            continue;
        }
        log::info!("Conversion OK: {}", output.display());

        match reconcile_metadata(input, &output) {
            Ok(()) => summary.converted += 1,
            Err(e) => {
                log::error!("Metadata reconciliation failed for {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "Finished: {} converted, {} failed",
        summary.converted,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("/music/song.m4a")),
            PathBuf::from("/music/song.mp3")
        );
        assert_eq!(
            derive_output_path(Path::new("/music/Track.M4A")),
            PathBuf::from("/music/Track.mp3")
        );
    }

    #[test]
    fn test_find_m4a_files_nonexistent_directory() {
        assert!(find_m4a_files(Path::new("/nonexistent/path")).is_err());
    }

    #[test]
    fn test_find_m4a_files_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = find_m4a_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_find_m4a_files_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("b.m4a")).unwrap();
        File::create(temp_dir.path().join("a.m4a")).unwrap();
        File::create(temp_dir.path().join("Upper.M4A")).unwrap();
        File::create(temp_dir.path().join("other.mp3")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let files = find_m4a_files(temp_dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["Upper.M4A", "a.m4a", "b.m4a"]);
    }

    #[test]
    fn test_find_m4a_files_skips_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("inner.m4a")).unwrap();

        let files = find_m4a_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_convert_folder_nonexistent_directory() {
        let tools = ToolPaths {
            ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe: PathBuf::from("/nonexistent/ffprobe"),
        };
        assert!(convert_folder(&tools, Path::new("/nonexistent/path")).is_err());
    }

    #[test]
    fn test_convert_folder_empty_directory() {
        let tools = ToolPaths {
            ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe: PathBuf::from("/nonexistent/ffprobe"),
        };
        let temp_dir = TempDir::new().unwrap();

        let summary = convert_folder(&tools, temp_dir.path()).unwrap();
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_convert_folder_continues_after_transcode_failure() {
        // With nonexistent tools, probing falls back to the default bitrate
        // and transcoding fails; both files are counted as failed and the
        // batch still completes.
        let tools = ToolPaths {
            ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe: PathBuf::from("/nonexistent/ffprobe"),
        };
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("one.m4a")).unwrap();
        File::create(temp_dir.path().join("two.m4a")).unwrap();

        let summary = convert_folder(&tools, temp_dir.path()).unwrap();
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.failed, 2);
    }
}
