//! Element stream reader.
//!
//! Streams are read as a generic JSON array first so that a malformed
//! element can be reported with its position, then each entry is decoded
//! into the closed [`RawElement`] variant.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::detect::{looks_like_element_stream, strip_bom};
use crate::error::{Error, Result};
use crate::model::{ElementStream, RawElement};

use super::options::{ErrorMode, ParseOptions};

/// Reader for raw element stream JSON.
pub struct StreamParser {
    data: Vec<u8>,
    source: Option<PathBuf>,
    options: ParseOptions,
}

impl StreamParser {
    /// Open a stream file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a stream file with options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Ok(Self {
            data,
            source: Some(path.to_path_buf()),
            options,
        })
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Create a parser from bytes with options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Self {
        Self {
            data: data.to_vec(),
            source: None,
            options,
        }
    }

    /// Create a parser from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Create a parser from a reader with options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self {
            data,
            source: None,
            options,
        })
    }

    /// Get the source path, if the stream was opened from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Decode the stream.
    pub fn parse(self) -> Result<ElementStream> {
        let data = strip_bom(&self.data);
        if !looks_like_element_stream(data) {
            return Err(Error::NotAnElementStream);
        }

        let value: Value = serde_json::from_slice(data)?;
        let Value::Array(items) = value else {
            return Err(Error::NotAnElementStream);
        };

        let mut stream = ElementStream::new();
        for (index, item) in items.into_iter().enumerate() {
            match decode_element(index, item) {
                Ok(element) => stream.push(element),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        log::warn!(
                            "Skipping element in {}: {}",
                            self.source_label(),
                            e
                        );
                    }
                },
            }
        }

        log::debug!(
            "Read {} elements from {}",
            stream.len(),
            self.source_label()
        );
        Ok(stream)
    }

    fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

fn decode_element(index: usize, item: Value) -> Result<RawElement> {
    if !item.is_object() {
        return Err(Error::malformed(index, "element is not an object"));
    }
    serde_json::from_value(item).map_err(|e| Error::malformed(index, e.to_string()))
}
