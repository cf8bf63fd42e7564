//! Document-level element stream.

use serde::{Deserialize, Serialize};

use super::{ElementKind, RawElement};

/// The ordered elements of one extracted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStream {
    /// Elements in reading order
    pub elements: Vec<RawElement>,
}

impl ElementStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream from elements.
    pub fn from_elements(elements: Vec<RawElement>) -> Self {
        Self { elements }
    }

    /// Add an element to the end of the stream.
    pub fn push(&mut self, element: RawElement) {
        self.elements.push(element);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the stream has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over elements in reading order.
    pub fn iter(&self) -> std::slice::Iter<'_, RawElement> {
        self.elements.iter()
    }

    /// Count elements of one kind.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    /// Get the elements as a slice.
    pub fn as_slice(&self) -> &[RawElement] {
        &self.elements
    }
}

impl From<Vec<RawElement>> for ElementStream {
    fn from(elements: Vec<RawElement>) -> Self {
        Self::from_elements(elements)
    }
}

impl<'a> IntoIterator for &'a ElementStream {
    type Item = &'a RawElement;
    type IntoIter = std::slice::Iter<'a, RawElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_stream_counts() {
        let stream = ElementStream::from(vec![
            RawElement::text("Deck means a platform"),
            RawElement::table_row(["a", "b"]),
            RawElement::image("x.png"),
            RawElement::text("(a) attached"),
        ]);
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.count(ElementKind::Text), 2);
        assert_eq!(stream.count(ElementKind::Image), 1);
    }

    #[test]
    fn test_element_stream_is_a_json_array() {
        let stream = ElementStream::from(vec![RawElement::image("x.png")]);
        let json = serde_json::to_string(&stream).unwrap();
        assert_eq!(json, r#"[{"type":"image","image_path":"x.png"}]"#);
    }
}
