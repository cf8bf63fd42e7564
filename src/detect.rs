//! Batch file naming and element stream detection.
//!
//! A batch directory holds one `<stem>_RAW.json` element stream per source
//! document, optionally with a `<stem>_LAYOUT.json` page layout beside it.
//! Each stream produces `<stem>_FINAL.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix of raw element stream files.
pub const RAW_SUFFIX: &str = "_RAW.json";

/// Suffix of final definition collection files.
pub const FINAL_SUFFIX: &str = "_FINAL.json";

/// Suffix of page layout files.
pub const LAYOUT_SUFFIX: &str = "_LAYOUT.json";

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Get the document stem of a raw stream filename.
///
/// # Example
/// ```
/// use defrip::detect::document_stem;
///
/// assert_eq!(document_stem("bylaw_RAW.json"), "bylaw");
/// assert_eq!(document_stem("notes.json"), "notes");
/// ```
pub fn document_stem(filename: &str) -> &str {
    filename
        .strip_suffix(RAW_SUFFIX)
        .or_else(|| filename.strip_suffix(".json"))
        .unwrap_or(filename)
}

/// Get the output filename for a raw stream filename.
pub fn final_output_name(filename: &str) -> String {
    format!("{}{}", document_stem(filename), FINAL_SUFFIX)
}

/// Get the layout path that belongs to a raw stream path.
pub fn layout_path_for(raw_path: &Path) -> PathBuf {
    let name = raw_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    raw_path.with_file_name(format!("{}{}", document_stem(&name), LAYOUT_SUFFIX))
}

/// Check if a path names a raw element stream.
pub fn is_raw_stream_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(RAW_SUFFIX))
}

/// Remove a leading UTF-8 byte order mark.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Check if bytes look like an element stream (a JSON array).
pub fn looks_like_element_stream(data: &[u8]) -> bool {
    strip_bom(data)
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[')
}

/// List the raw element streams in a directory, sorted by name.
pub fn find_raw_streams<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_raw_stream_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
