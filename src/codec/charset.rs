//! Charset conversion backed by `encoding_rs`
//!
//! Labels are resolved per the WHATWG Encoding Standard, so common MIME
//! aliases (`us-ascii`, `latin1`, `utf8`, ...) all resolve. Note that
//! `us-ascii` and `iso-8859-1` both map to windows-1252, a superset.

use encoding_rs::Encoding;

/// Resolve a charset label
pub fn lookup(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decode bytes under the named charset
///
/// Returns `None` when the label is unknown. Malformed sequences are
/// replaced with U+FFFD.
pub fn decode(bytes: &[u8], label: &str) -> Option<String> {
    lookup(label).map(|encoding| decode_with(encoding, bytes))
}

/// Encode text under the named charset
///
/// Returns `None` when the label is unknown. Unmappable characters are
/// written as numeric character references, as `encoding_rs` does.
pub fn encode(text: &str, label: &str) -> Option<Vec<u8>> {
    lookup(label).map(|encoding| encode_with(encoding, text))
}

pub(crate) fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

pub(crate) fn encode_with(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}
