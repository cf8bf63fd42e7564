//! Exact-match linking of image files to term identifiers.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::model::image::slug_prefix;
use crate::model::ImageList;

/// Index of image filenames by the slug prefix before `_img`.
///
/// Filenames that do not contain `_img` are never linked.
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    by_slug: BTreeMap<String, Vec<String>>,
    total: usize,
}

impl ImageIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a flat image directory.
    ///
    /// A missing directory yields an empty index. Subdirectories are
    /// ignored.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("Image directory {} not found", dir.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        let index = Self::from_names(names);
        log::debug!(
            "Indexed {} images from {}",
            index.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Build an index from an explicit listing of filenames.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for name in names {
            index.insert(name.into());
        }
        index
    }

    /// Add a filename to the index.
    pub fn insert(&mut self, filename: String) {
        let Some(prefix) = slug_prefix(&filename) else {
            return;
        };
        let files = self.by_slug.entry(prefix.to_string()).or_default();
        if let Err(pos) = files.binary_search(&filename) {
            files.insert(pos, filename);
            self.total += 1;
        }
    }

    /// Get every image whose slug prefix equals `term_id` exactly.
    ///
    /// Filenames are returned in sorted order.
    pub fn link(&self, term_id: &str) -> ImageList {
        self.by_slug
            .get(term_id)
            .map(|files| files.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of linkable filenames.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Check if the index has no linkable filenames.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
