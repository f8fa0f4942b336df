//! Headers kept as raw text

use crate::encoded_words::{decode_header_value, encode_header_value};

/// A header whose value is kept verbatim
///
/// Used for Content-Description, Content-Location, Content-ID and every
/// field this crate does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unstructured {
    name: String,
    value: String,
}

impl Unstructured {
    /// Create a header from its name and unfolded value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Field name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value, encoded words left as-is
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value with RFC 2047 encoded words decoded
    pub fn text(&self) -> String {
        decode_header_value(&self.value)
    }

    /// Replace the value; non-ASCII text is encoded on serialization
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.value = text.into();
    }

    /// Check if the value is blank
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Serialize as `Name: value`, encoding non-ASCII text
    pub fn as_7bit_string(&self) -> String {
        format!("{}: {}", self.name, encode_header_value(&self.value))
    }
}
