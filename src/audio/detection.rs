use std::path::Path;

/// Check if a file is an M4A file based on its extension (case-insensitive)
pub fn is_m4a_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        ext.to_string_lossy().eq_ignore_ascii_case("m4a")
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_m4a() {
        assert!(is_m4a_file(Path::new("test.m4a")));
        assert!(is_m4a_file(Path::new("/music/album/Track 01.m4a")));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(is_m4a_file(Path::new("Track.M4A")));
        assert!(is_m4a_file(Path::new("Track.m4A")));
    }

    #[test]
    fn test_rejects_other_files() {
        assert!(!is_m4a_file(Path::new("test.mp3")));
        assert!(!is_m4a_file(Path::new("test.flac")));
        assert!(!is_m4a_file(Path::new("test.m4a.txt")));
        assert!(!is_m4a_file(Path::new("test")));
    }
}
