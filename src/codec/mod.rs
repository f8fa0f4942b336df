//! Transfer codecs and charset conversion
//!
//! Byte-level primitives used by the transfer-encoding engine. Every decoder
//! here is total: malformed input degrades to a best-effort result instead of
//! an error, because body bytes from the wild are routinely non-conformant.
//!
//! - `base64`: RFC 2045 Section 6.8, wrapped at 76 columns
//! - `quoted_printable`: RFC 2045 Section 6.7
//! - `uuencode`: traditional Unix-to-Unix encoding
//! - `charset`: text <-> bytes under a named charset

pub mod base64;
pub mod charset;
pub mod quoted_printable;
pub mod uuencode;

/// Convert bare LF line endings to CRLF
///
/// Existing CRLF pairs are left alone so the conversion is idempotent.
pub fn lf_to_crlf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 32);
    let mut prev = 0u8;
    for &byte in input {
        if byte == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        out.push(byte);
        prev = byte;
    }
    out
}

/// Convert CRLF line endings to bare LF
///
/// Wire and `.eml` input uses CRLF; the content tree works on LF. A CR that
/// is not followed by LF is kept.
pub fn crlf_to_lf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.iter().peekable();
    while let Some(&byte) = bytes.next() {
        if byte == b'\r' && bytes.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(byte);
    }
    out
}
