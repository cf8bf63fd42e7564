//! Cross-reference annotation of definition bodies.
//!
//! Wraps whole-word mentions of known terms in
//! `<span class="def-link" data-id="...">` so a front end can link them to
//! their definitions. Longer terms are applied first, and text inside an
//! existing tag is never touched.

use regex::{Captures, Regex};

use crate::model::DefinitionRecord;

/// Annotates term mentions with link spans.
#[derive(Debug, Clone)]
pub struct CrossLinker {
    terms: Vec<(Regex, String)>,
}

impl CrossLinker {
    /// Build a linker for the terms of a record collection.
    pub fn new<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DefinitionRecord>,
    {
        Self::from_terms(
            records
                .into_iter()
                .map(|r| (r.term.clone(), r.term_id.clone())),
        )
    }

    /// Build a linker from `(display term, term id)` pairs.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (name, id) in terms {
            let name = name.trim().to_string();
            if name.is_empty() || pairs.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                continue;
            }
            pairs.push((name, id));
        }
        // Longest first so "Gross Floor Area" wins over "Floor Area"
        pairs.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let terms = pairs
            .into_iter()
            .filter_map(|(name, id)| {
                let pattern = format!(r"(?i)\b({})\b", regex::escape(&name));
                match Regex::new(&pattern) {
                    Ok(re) => Some((re, id)),
                    Err(e) => {
                        log::warn!("Cannot link term '{}': {}", name, e);
                        None
                    }
                }
            })
            .collect();

        Self { terms }
    }

    /// Number of linkable terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if there are no linkable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Annotate one text.
    pub fn annotate(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (re, id) in &self.terms {
            result = replace_outside_tags(&result, re, id);
        }
        result
    }

    /// Produce new records with annotated bodies.
    pub fn apply(&self, records: Vec<DefinitionRecord>) -> Vec<DefinitionRecord> {
        records
            .into_iter()
            .map(|record| {
                let text = self.annotate(&record.text);
                DefinitionRecord { text, ..record }
            })
            .collect()
    }
}

fn replace_outside_tags(text: &str, re: &Regex, id: &str) -> String {
    let link = |caps: &Captures| {
        format!(
            r#"<span class="def-link" data-id="{}">{}</span>"#,
            id, &caps[1]
        )
    };

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&re.replace_all(&rest[..open], &link));
        out.push_str(&rest[open..open + close + 1]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(&re.replace_all(rest, &link));
    out
}
