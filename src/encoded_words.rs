//! RFC 2047 Encoded Words Support
//!
//! Encoded words allow non-ASCII text in otherwise 7-bit header fields.
//! They have the format: `=?charset?encoding?encoded-text?=`
//!
//! Decoding is used when reading unstructured header text (descriptions,
//! legacy filenames); encoding is used when re-serializing a header whose
//! text is not 7-bit clean.
//!
//! ## Supported Encodings
//! - `B` - Base64 (RFC 2045)
//! - `Q` - Quoted-Printable variant (RFC 2047)
//!
//! ```
//! use nntp_mime::encoded_words::{decode_header_value, encode_header_value};
//!
//! let subject = decode_header_value("Re: =?ISO-8859-1?Q?M=FCnchen?=");
//! assert_eq!(subject, "Re: München");
//!
//! let wire = encode_header_value("München");
//! assert!(wire.is_ascii());
//! assert_eq!(decode_header_value(&wire), "München");
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::codec::charset;

/// Longest encoded word permitted by RFC 2047 Section 2
const MAX_WORD_LEN: usize = 75;

/// Overhead of `=?utf-8?B?` + `?=`
const WORD_OVERHEAD: usize = 12;

/// Decodes a single RFC 2047 encoded word.
///
/// Returns the decoded string, or the original input if decoding fails.
///
/// # Examples
///
/// ```
/// use nntp_mime::encoded_words::decode_encoded_word;
///
/// assert_eq!(decode_encoded_word("=?UTF-8?B?SGVsbG8=?="), "Hello");
/// assert_eq!(decode_encoded_word("=?ISO-8859-1?Q?Caf=E9?="), "Café");
/// assert_eq!(decode_encoded_word("not an encoded word"), "not an encoded word");
/// ```
pub fn decode_encoded_word(encoded: &str) -> String {
    if !encoded.starts_with("=?") || !encoded.ends_with("?=") || encoded.len() < 4 {
        return encoded.to_string();
    }

    let inner = &encoded[2..encoded.len() - 2];
    let parts: Vec<&str> = inner.splitn(3, '?').collect();
    if parts.len() != 3 {
        return encoded.to_string();
    }

    // RFC 2231 allows a language suffix: charset*lang
    let charset = parts[0].split('*').next().unwrap_or_default();
    let encoding = parts[1].to_ascii_uppercase();
    let encoded_text = parts[2];

    let decoded_bytes = match encoding.as_str() {
        "B" => match BASE64.decode(encoded_text) {
            Ok(bytes) => bytes,
            Err(_) => return encoded.to_string(),
        },
        "Q" => decode_q(encoded_text),
        _ => return encoded.to_string(),
    };

    charset::decode(&decoded_bytes, charset)
        .unwrap_or_else(|| String::from_utf8_lossy(&decoded_bytes).into_owned())
}

/// Decodes a header value that may contain one or more encoded words.
///
/// # Behavior
/// - Multiple consecutive encoded words: whitespace between them is removed per RFC 2047
/// - Mixed encoded and plain text: both are handled correctly
/// - Invalid encoded words: passed through unchanged
///
/// # Examples
///
/// ```
/// use nntp_mime::encoded_words::decode_header_value;
///
/// let text = decode_header_value("=?UTF-8?B?SGVsbG8=?= =?UTF-8?B?V29ybGQ=?=");
/// assert_eq!(text, "HelloWorld");
///
/// let plain = decode_header_value("Plain ASCII subject");
/// assert_eq!(plain, "Plain ASCII subject");
/// ```
pub fn decode_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut last_was_encoded = false;
    let mut rest = value;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with("=?")
            && let Some(end_idx) = find_encoded_word_end(rest)
        {
            let decoded = decode_encoded_word(&rest[..end_idx]);

            // Whitespace between adjacent encoded words is not part of the text
            if last_was_encoded {
                while result.ends_with(' ') || result.ends_with('\t') {
                    result.pop();
                }
            }

            result.push_str(&decoded);
            last_was_encoded = true;
            rest = &rest[end_idx..];
            continue;
        }

        result.push(ch);
        if ch != ' ' && ch != '\t' {
            last_was_encoded = false;
        }
        rest = &rest[ch.len_utf8()..];
    }

    result
}

/// Encodes text for use in a 7-bit header field.
///
/// ASCII text is returned unchanged. Anything else becomes a sequence of
/// UTF-8 `B` encoded words, each at most 75 characters long and never
/// splitting a character.
pub fn encode_header_value(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    // Three input bytes become four output characters
    let max_chunk = (MAX_WORD_LEN - WORD_OVERHEAD) / 4 * 3;

    let mut words = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_len = 0;
    for (idx, ch) in text.char_indices() {
        if chunk_len + ch.len_utf8() > max_chunk {
            words.push(encode_word(&text[chunk_start..idx]));
            chunk_start = idx;
            chunk_len = 0;
        }
        chunk_len += ch.len_utf8();
    }
    if chunk_start < text.len() {
        words.push(encode_word(&text[chunk_start..]));
    }

    words.join(" ")
}

fn encode_word(text: &str) -> String {
    format!("=?utf-8?B?{}?=", BASE64.encode(text.as_bytes()))
}

/// Finds the end position of an encoded word starting at the beginning of the input.
///
/// Returns the byte index after the closing `?=`, or None if no valid encoded word is found.
fn find_encoded_word_end(input: &str) -> Option<usize> {
    if !input.starts_with("=?") {
        return None;
    }

    let mut question_count = 0;
    let bytes = input.as_bytes();

    for i in 2..bytes.len() {
        match bytes[i] {
            b'?' => {
                question_count += 1;
                // charset?encoding?text?=
                if question_count >= 3 && i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    return Some(i + 2);
                }
            }
            b' ' | b'\t' => return None,
            _ => {}
        }
    }

    None
}

/// Decodes the Q encoding: quoted-printable with `_` standing for space
fn decode_q(encoded: &str) -> Vec<u8> {
    let spaced: Vec<u8> = encoded
        .bytes()
        .map(|b| if b == b'_' { b' ' } else { b })
        .collect();
    crate::codec::quoted_printable::decode(&spaced)
}
