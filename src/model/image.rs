//! Image file helpers: extension detection and the image naming convention.

use std::path::Path;

/// Marker separating the term slug from the sequence number in image names.
pub const IMAGE_MARKER: &str = "_img";

/// Build the filename the positional associator gives an image.
///
/// `<slug>_img<N>.<ext>`
pub fn image_filename(slug: &str, sequence: u32, ext: &str) -> String {
    format!("{}{}{}.{}", slug, IMAGE_MARKER, sequence, ext)
}

/// Get the slug prefix of an image filename.
///
/// Returns the portion before the first `_img`, or `None` when the name
/// does not follow the naming convention.
pub fn slug_prefix(filename: &str) -> Option<&str> {
    filename.find(IMAGE_MARKER).map(|pos| &filename[..pos])
}

/// Get the lowercase extension of a path, if any.
pub fn path_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

/// Sniff the extension of image data from its leading bytes.
///
/// Covers what the page extractor writes; anything else is `None`.
pub fn detect_extension(data: &[u8]) -> Option<&'static str> {
    const SIGNATURES: [(&[u8], &str); 4] = [
        (b"\x89PNG\r\n\x1a\n", "png"),
        (b"\xFF\xD8\xFF", "jpeg"),
        (b"GIF87a", "gif"),
        (b"GIF89a", "gif"),
    ];
    SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|&(_, ext)| ext)
}
