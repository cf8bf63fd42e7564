//! JSON rendering for definition collections.

use crate::error::{Error, Result};
use crate::model::DefinitionRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a definition collection to JSON, preserving record order.
pub fn to_json(records: &[DefinitionRecord], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(records),
        JsonFormat::Compact => serde_json::to_string(records),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a definition collection back from JSON.
pub fn from_json(json: &str) -> Result<Vec<DefinitionRecord>> {
    Ok(serde_json::from_str(json)?)
}
