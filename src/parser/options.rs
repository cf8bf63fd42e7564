//! Parsing options and configuration.

use crate::model::Classification;

use super::cleanup::CleanupOptions;

/// Options for reading element streams and segmenting definitions.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Classification given to every record
    pub classification: Classification,

    /// Text cleanup applied to element content before matching
    pub cleanup: CleanupOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip malformed elements).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the classification given to records.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Set text cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Enable Unicode and glyph normalization of element text.
    pub fn normalized(mut self) -> Self {
        self.cleanup = CleanupOptions::normalized();
        self
    }

    /// Check if malformed elements are skipped rather than fatal.
    pub fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

/// Error handling mode while reading an element stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any malformed element
    #[default]
    Strict,
    /// Skip malformed elements and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.classification, Classification::General);
        assert!(!options.cleanup.is_enabled());
    }

    #[test]
    fn test_builder_chain() {
        let options = ParseOptions::new()
            .lenient()
            .normalized()
            .with_classification(Classification::Use);
        assert!(options.is_lenient());
        assert!(options.cleanup.normalize_unicode);
        assert_eq!(options.classification, Classification::Use);
    }
}
