//! Optional cleanup of element text before definition matching.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

/// Bullet glyphs rewritten to `•`.
const BULLET_GLYPHS: [char; 6] = ['●', '○', '▪', '◦', '■', '►'];

/// Options for text cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Standardize bullet glyphs (a lone `x` is the extractor's bullet)
    pub standardize_glyphs: bool,
}

impl CleanupOptions {
    /// No cleanup: text is matched exactly as extracted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Unicode normalization and glyph standardization.
    pub fn normalized() -> Self {
        Self {
            normalize_unicode: true,
            standardize_glyphs: true,
        }
    }

    /// Check if any cleanup step is enabled.
    pub fn is_enabled(&self) -> bool {
        self.normalize_unicode || self.standardize_glyphs
    }
}

/// Text cleanup applied to each text element.
#[derive(Debug, Clone, Default)]
pub struct TextCleanup {
    options: CleanupOptions,
}

impl TextCleanup {
    /// Create a cleanup step with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Trim and clean one text element.
    ///
    /// Borrows the input when no cleanup step is enabled.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        let trimmed = content.trim();
        if !self.options.is_enabled() {
            return Cow::Borrowed(trimmed);
        }

        let mut result = trimmed.to_string();

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.standardize_glyphs {
            result = standardize_glyphs(&result);
        }

        Cow::Owned(result)
    }
}

fn standardize_glyphs(text: &str) -> String {
    if text.eq_ignore_ascii_case("x") {
        return "•".to_string();
    }
    let mut result = text.to_string();
    for glyph in BULLET_GLYPHS {
        result = result.replace(glyph, "•");
    }
    result
}
