//! Definition-start pattern: `[**]Term[**] means[:] body`.

use regex::Regex;

use super::slug::strip_emphasis;

/// Optional opening emphasis, a single-line term, optional closing emphasis,
/// the word "means" with optional colon/whitespace, then the body. The body
/// may span lines.
const DEFINITION_START: &str = r"(?is)^(?:\*\*|__)?([^\n]+?)(?:\*\*|__)?\s+means[:\s]*(.*)$";

/// The parts of a definition-start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionStart<'a> {
    /// Term phrase, trimmed, possibly with residual emphasis markers
    pub term: &'a str,
    /// Remainder of the line after "means", trimmed
    pub body: &'a str,
}

/// Matcher for lines that open a definition.
#[derive(Debug, Clone)]
pub struct DefinitionMatcher {
    start: Regex,
}

impl DefinitionMatcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self {
            start: Regex::new(DEFINITION_START).unwrap(),
        }
    }

    /// Match a trimmed text block against the definition-start pattern.
    ///
    /// A match whose term is empty once emphasis markers are removed is
    /// not a definition.
    pub fn match_start<'a>(&self, content: &'a str) -> Option<DefinitionStart<'a>> {
        let caps = self.start.captures(content)?;
        let term = caps.get(1)?.as_str().trim();
        if strip_emphasis(term).trim().is_empty() {
            return None;
        }
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();
        Some(DefinitionStart { term, body })
    }

    /// Check if a trimmed text block opens a definition.
    pub fn is_start(&self, content: &str) -> bool {
        self.match_start(content).is_some()
    }
}

impl Default for DefinitionMatcher {
    fn default() -> Self {
        Self::new()
    }
}
