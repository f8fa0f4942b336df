//! Base64 body encoding (RFC 2045 Section 6.8)

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Maximum encoded line length mandated by RFC 2045
pub const LINE_LENGTH: usize = 76;

/// Decoder that accepts unpadded input and stray trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as base64 wrapped at 76 columns
///
/// Lines are separated by LF; there is no line break after the last line.
///
/// # Example
///
/// ```
/// use nntp_mime::codec::base64;
///
/// assert_eq!(base64::encode(b"Hello"), b"SGVsbG8=");
/// ```
pub fn encode(input: &[u8]) -> Vec<u8> {
    let encoded = STANDARD.encode(input);
    let mut out = Vec::with_capacity(encoded.len() + encoded.len() / LINE_LENGTH);
    for (i, line) in encoded.as_bytes().chunks(LINE_LENGTH).enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(line);
    }
    out
}

/// Decode base64, ignoring line breaks and any byte outside the alphabet
///
/// Never fails: a dangling sextet that cannot form a byte is dropped.
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut filtered: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();

    // A single leftover character carries fewer than 8 bits
    if filtered.len() % 4 == 1 {
        filtered.pop();
    }

    LENIENT.decode(&filtered).unwrap_or_default()
}

/// Exact length of `encode(input)` plus one line break per line
///
/// This is what a body of `len` raw bytes occupies on the wire once encoded
/// and terminated by a line break.
pub fn encoded_len(len: usize) -> usize {
    let chars = len.div_ceil(3) * 4;
    chars + chars.div_ceil(LINE_LENGTH)
}
