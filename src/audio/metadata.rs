//! Metadata reconciliation between source M4A files and converted MP3s
//!
//! ffmpeg's `-map_metadata 0` copies most container-level tags on its own,
//! so the rules here are fill-in only: a field ffmpeg already wrote is never
//! overwritten. Cover art is handled separately because MP4 `covr` atoms do
//! not survive the transcode and must be re-embedded as an ID3v2 picture
//! frame.

use std::path::Path;

use lofty::{
    ItemKey, MimeType, Picture, PictureType, Probe, Tag, TagExt, TaggedFile, TaggedFileExt,
};

/// The fixed set of tag fields reconciled after transcoding
///
/// lofty maps the container-native key on each side (MP4 atoms like `©nam`
/// and `trkn`, ID3v2 frames like TIT2 and TRCK) to these normalized keys.
fn mapped_fields() -> [ItemKey; 6] {
    [
        ItemKey::TrackTitle,
        ItemKey::TrackArtist,
        ItemKey::AlbumTitle,
        ItemKey::TrackNumber,
        ItemKey::RecordingDate,
        ItemKey::Genre,
    ]
}

/// Copy tag fields present in the source but absent in the destination
///
/// Destination values always win: a field the transcoder already populated
/// is left untouched. Returns the number of fields copied.
pub fn copy_missing_tags(source: &Path, dest: &Path) -> Result<usize, String> {
    let source_file = read_tagged_file(source)?;
    let source_tag = source_file
        .primary_tag()
        .or_else(|| source_file.first_tag())
        .ok_or_else(|| format!("No tags found in {}", source.display()))?;

    let mut dest_file = read_tagged_file(dest)?;
    let dest_tag = primary_tag_or_insert(&mut dest_file)?;

    let mut copied = 0;
    for key in mapped_fields() {
        let Some(value) = source_tag.get_string(&key) else {
            continue;
        };
        if dest_tag.get_string(&key).is_none() {
            dest_tag.insert_text(key, value.to_string());
            copied += 1;
        }
    }

    dest_tag
        .save_to_path(dest)
        .map_err(|e| format!("Failed to save tags to {}: {}", dest.display(), e))?;

    Ok(copied)
}

/// Copy embedded cover art from the source into the destination
///
/// Prefers the front cover, falls back to the first embedded picture. All
/// existing pictures in the destination are removed first, so re-running
/// never accumulates duplicate frames. Returns `Ok(false)` when the source
/// has no embedded art.
pub fn copy_cover_art(source: &Path, dest: &Path) -> Result<bool, String> {
    let source_file = read_tagged_file(source)?;
    let source_tag = source_file
        .primary_tag()
        .or_else(|| source_file.first_tag())
        .ok_or_else(|| format!("No tags found in {}", source.display()))?;

    let picture = match source_tag
        .pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| source_tag.pictures().first())
    {
        Some(p) => p,
        None => return Ok(false),
    };

    let mime = cover_mime(picture.mime_type().unwrap_or(&MimeType::Png));

    let mut dest_file = read_tagged_file(dest)?;
    let dest_tag = primary_tag_or_insert(&mut dest_file)?;

    while !dest_tag.pictures().is_empty() {
        dest_tag.remove_picture(0);
    }
    dest_tag.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(mime),
        Some(String::from("Cover")),
        picture.data().to_vec(),
    ));

    dest_tag
        .save_to_path(dest)
        .map_err(|e| format!("Failed to save cover art to {}: {}", dest.display(), e))?;

    Ok(true)
}

/// Run the full reconciliation for one (source, destination) pair
///
/// Field mapping failure is this function's failure. Cover art is
/// best-effort: its failure is logged and does not undo the tag fields
/// that were already persisted.
pub fn reconcile_metadata(source: &Path, dest: &Path) -> Result<(), String> {
    let copied = copy_missing_tags(source, dest)?;
    if copied > 0 {
        log::info!(
            "Copied {} missing tag field(s) from {}",
            copied,
            source.display()
        );
    }

    match copy_cover_art(source, dest) {
        Ok(true) => log::info!("Cover art copied to {}", dest.display()),
        Ok(false) => log::debug!("No cover art in {}", source.display()),
        Err(e) => log::warn!("Could not copy cover art to {}: {}", dest.display(), e),
    }

    Ok(())
}

/// MIME type for the re-embedded cover: JPEG sources stay JPEG, anything
/// else is written as PNG
fn cover_mime(source: &MimeType) -> MimeType {
    match source {
        MimeType::Jpeg => MimeType::Jpeg,
        _ => MimeType::Png,
    }
}

fn read_tagged_file(path: &Path) -> Result<TaggedFile, String> {
    Probe::open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?
        .read()
        .map_err(|e| format!("Failed to read tags from {}: {}", path.display(), e))
}

fn primary_tag_or_insert(tagged_file: &mut TaggedFile) -> Result<&mut Tag, String> {
    if tagged_file.primary_tag_mut().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    tagged_file
        .primary_tag_mut()
        .ok_or_else(|| "Failed to create tag".to_string())
}
