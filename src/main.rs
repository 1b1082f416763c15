//! M4A to MP3 batch converter
//!
//! Converts every `.m4a` file in a folder to `.mp3`, preserving the source
//! bitrate, tags, and cover art. Transcoding and probing are delegated to
//! ffmpeg/ffprobe; tag fields the transcoder leaves empty are filled in
//! afterwards from the source file.

mod audio;
mod batch;
mod conversion;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    logging::init_logging();

    let tools = conversion::ToolPaths::resolve();
    if let Err(e) = conversion::verify_tools(&tools) {
        log::error!("{}", e);
        log::error!("Install ffmpeg or set FFMPEG_PATH / FFPROBE_PATH.");
        std::process::exit(1);
    }

    let folder = match prompt_for_folder() {
        Some(folder) => folder,
        None => {
            log::error!("No folder path given");
            std::process::exit(1);
        }
    };

    if let Err(e) = batch::convert_folder(&tools, &folder) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Read the target folder path from a single interactive prompt
fn prompt_for_folder() -> Option<PathBuf> {
    print!("Enter the path of the folder with .m4a files: ");
    io::stdout().flush().ok();

    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
