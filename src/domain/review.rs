//! Client-side rules of the review form: photo selection and the text counter.

use std::path::Path;
use thiserror::Error;

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
/// Longest file name shown as-is under the upload button.
pub const PHOTO_NAME_MAX_CHARS: usize = 20;
/// Past this many characters the counter turns red. Nothing is blocked.
pub const REVIEW_TEXT_LIMIT: usize = 150;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoRejection {
    #[error("Please select an image file (JPG, PNG, GIF)")]
    NotAnImage,
    #[error("File size should be less than 5MB")]
    TooLarge,
}

/// A photo accepted for upload, with what the button shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPhoto {
    pub file_name: String,
    pub display_name: String,
    pub size_label: String,
}

/// Accepts any `image` media type up to [`MAX_PHOTO_BYTES`].
pub fn select_photo(
    file_name: &str,
    media_type: &str,
    size: u64,
) -> Result<SelectedPhoto, PhotoRejection> {
    if !media_type.contains("image") {
        return Err(PhotoRejection::NotAnImage);
    }
    if size > MAX_PHOTO_BYTES {
        return Err(PhotoRejection::TooLarge);
    }
    Ok(SelectedPhoto {
        file_name: file_name.to_string(),
        display_name: display_file_name(file_name),
        size_label: format_file_size(size),
    })
}

/// Shortens long names to `stem...ext` within [`PHOTO_NAME_MAX_CHARS`].
/// The dot before the extension is dropped, as on the page.
pub fn display_file_name(name: &str) -> String {
    if name.chars().count() <= PHOTO_NAME_MAX_CHARS {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            let keep = PHOTO_NAME_MAX_CHARS.saturating_sub(ext.chars().count() + 3);
            let head: String = stem.chars().take(keep).collect();
            format!("{head}...{ext}")
        }
        None => {
            let head: String = name.chars().take(PHOTO_NAME_MAX_CHARS - 3).collect();
            format!("{head}...")
        }
    }
}

/// `1536` -> `1.5 KB`. One decimal at most, none when it is zero.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0} {}", UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}

/// Media type for a local file, from its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Characters typed so far and whether the counter is over the limit.
pub fn text_counter(text: &str) -> (usize, bool) {
    let count = text.chars().count();
    (count, count > REVIEW_TEXT_LIMIT)
}
