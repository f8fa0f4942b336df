//! MIME header objects
//!
//! Only the fields that shape the content tree are interpreted:
//! Content-Type, Content-Transfer-Encoding and Content-Disposition. Every
//! other field is kept as [`Unstructured`] text so it re-serializes as read.
//!
//! ## Header block format (RFC 5322 Section 2.2)
//!
//! ```text
//! Content-Type: multipart/mixed;
//!  boundary="=_part"
//! Content-Transfer-Encoding: 7bit
//! ```
//!
//! Lines starting with whitespace continue the previous field. Unfolding
//! removes only the line break, keeping the whitespace.

mod content_type;
mod disposition;
mod params;
mod transfer_encoding;
mod unstructured;

pub use content_type::{ContentCategory, ContentType};
pub use disposition::{ContentDisposition, Disposition};
pub use params::Params;
pub use transfer_encoding::{ContentTransferEncoding, Encoding};
pub use unstructured::Unstructured;

use crate::codec::charset;

/// Header field names understood by this crate
pub mod names {
    /// Content-Type
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Content-Transfer-Encoding
    pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
    /// Content-Disposition
    pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
    /// Content-Description
    pub const CONTENT_DESCRIPTION: &str = "Content-Description";
    /// Content-Location
    pub const CONTENT_LOCATION: &str = "Content-Location";
    /// Content-ID
    pub const CONTENT_ID: &str = "Content-ID";
    /// Subject, consulted as a part-number hint by the uuencode detector
    pub const SUBJECT: &str = "Subject";
}

/// One header field of a content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// Content-Type
    ContentType(ContentType),
    /// Content-Transfer-Encoding
    ContentTransferEncoding(ContentTransferEncoding),
    /// Content-Disposition
    ContentDisposition(ContentDisposition),
    /// Content-Description
    ContentDescription(Unstructured),
    /// Content-Location
    ContentLocation(Unstructured),
    /// Content-ID
    ContentId(Unstructured),
    /// Any other field
    Generic(Unstructured),
}

impl Header {
    /// Build a header from an unfolded `name: value` pair
    pub fn parse(name: &str, value: &str) -> Self {
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "content-type" => Header::ContentType(ContentType::parse(value)),
            "content-transfer-encoding" => {
                Header::ContentTransferEncoding(ContentTransferEncoding::parse(value))
            }
            "content-disposition" => Header::ContentDisposition(ContentDisposition::parse(value)),
            "content-description" => Header::ContentDescription(Unstructured::new(name, value)),
            "content-location" => Header::ContentLocation(Unstructured::new(name, value)),
            "content-id" => Header::ContentId(Unstructured::new(name, value)),
            _ => Header::Generic(Unstructured::new(name, value)),
        }
    }

    /// Type tag: the field name
    pub fn name(&self) -> &str {
        match self {
            Header::ContentType(_) => names::CONTENT_TYPE,
            Header::ContentTransferEncoding(_) => names::CONTENT_TRANSFER_ENCODING,
            Header::ContentDisposition(_) => names::CONTENT_DISPOSITION,
            Header::ContentDescription(h)
            | Header::ContentLocation(h)
            | Header::ContentId(h)
            | Header::Generic(h) => h.name(),
        }
    }

    /// Check the type tag, case-insensitively
    pub fn is(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }

    /// MIME-structural fields are the `Content-*` family
    pub fn is_mime_header(&self) -> bool {
        let name = self.name().as_bytes();
        name.len() >= 8 && name[..8].eq_ignore_ascii_case(b"content-")
    }

    /// Empty headers are skipped when the head is regenerated
    pub fn is_empty(&self) -> bool {
        match self {
            Header::ContentType(h) => h.is_empty(),
            // Always meaningful: an absent token still declares 7bit
            Header::ContentTransferEncoding(_) => false,
            Header::ContentDisposition(h) => h.is_empty(),
            Header::ContentDescription(h)
            | Header::ContentLocation(h)
            | Header::ContentId(h)
            | Header::Generic(h) => h.is_empty(),
        }
    }

    /// Wire form `Name: value`, 7-bit clean and unfolded
    pub fn as_7bit_string(&self) -> String {
        match self {
            Header::ContentType(h) => h.as_7bit_string(),
            Header::ContentTransferEncoding(h) => h.as_7bit_string(),
            Header::ContentDisposition(h) => h.as_7bit_string(),
            Header::ContentDescription(h)
            | Header::ContentLocation(h)
            | Header::ContentId(h)
            | Header::Generic(h) => h.as_7bit_string(),
        }
    }

    /// Raw text of an unstructured header
    pub fn as_unstructured(&self) -> Option<&Unstructured> {
        match self {
            Header::ContentDescription(h)
            | Header::ContentLocation(h)
            | Header::ContentId(h)
            | Header::Generic(h) => Some(h),
            _ => None,
        }
    }
}

/// Statically typed view of a [`Header`] variant
///
/// Lets the content tree hand out `&ContentType` and friends directly:
///
/// ```
/// use nntp_mime::ContentTree;
/// use nntp_mime::headers::ContentType;
///
/// let mut tree = ContentTree::new();
/// let root = tree.parse_new(b"Content-Type: text/html\n\n<p>hi</p>\n");
/// let ct = tree.header::<ContentType>(root).unwrap();
/// assert!(ct.is_sub_type("html"));
/// ```
pub trait TypedHeader: Default + Sized {
    /// Field name used as the type tag
    const NAME: &'static str;

    /// Borrow the typed value when `header` is this variant
    fn from_header(header: &Header) -> Option<&Self>;

    /// Mutably borrow the typed value, replacing `header` with an empty
    /// value of this type when it is another variant
    fn coerce_mut(header: &mut Header) -> &mut Self;

    /// Wrap into the matching variant
    fn into_header(self) -> Header;
}

/// Parse a raw header block into header objects
///
/// Lines are split on LF (a trailing CR is dropped), continuation lines are
/// unfolded, and each field is split at its first colon. Lines without a
/// colon are dropped.
pub fn parse_headers(head: &[u8]) -> Vec<Header> {
    let text = head_text(head);
    let mut headers = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation: the line break goes, the whitespace stays
            if let Some((_, value)) = current.as_mut() {
                value.push_str(line);
            }
            continue;
        }

        if let Some((name, value)) = current.take() {
            headers.push(Header::parse(&name, &value));
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                current = Some((name.to_string(), value.to_string()));
            }
        }
    }

    if let Some((name, value)) = current {
        headers.push(Header::parse(&name, &value));
    }

    headers
}

/// Header bytes as text: UTF-8 when valid, otherwise Latin-1
fn head_text(head: &[u8]) -> String {
    match std::str::from_utf8(head) {
        Ok(text) => text.to_string(),
        Err(_) => charset::decode_with(encoding_rs::WINDOWS_1252, head),
    }
}

/// Fold a serialized header line so each line stays within `width`
///
/// Breaks are placed before whitespace, never inside the field name.
/// A run without whitespace longer than `width` stays on one line.
pub fn fold_header(line: &str, width: usize) -> String {
    if line.len() <= width {
        return line.to_string();
    }

    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len() + line.len() / width * 2);
    let mut start = 0;
    // First break no earlier than after "Name: "
    let mut min = line.find(':').map_or(1, |pos| pos + 2);

    while line.len() - start > width {
        let is_space = |b: &u8| *b == b' ' || *b == b'\t';
        let lo = start + min;
        let hi = start + width;
        let before = (lo <= hi)
            .then(|| bytes[lo..=hi].iter().rposition(is_space).map(|p| lo + p))
            .flatten();
        let split = before.or_else(|| {
            let from = lo.max(hi + 1).min(bytes.len());
            bytes[from..].iter().position(is_space).map(|p| from + p)
        });

        match split {
            Some(pos) if pos > start => {
                out.push_str(&line[start..pos]);
                out.push('\n');
                start = pos;
            }
            _ => break,
        }
        min = 1;
    }

    out.push_str(&line[start..]);
    out
}

/// Split raw content into head and body at the first blank line
///
/// - Content starting with LF has an empty head.
/// - Otherwise the head keeps the LF that ends its last line; the blank
///   line itself is dropped.
/// - A body that itself starts with LF gets one more LF prepended, so
///   re-joining head, separator and body reproduces the input.
/// - Without a blank line everything is head.
pub fn split_head_body(content: &[u8]) -> (Vec<u8>, Vec<u8>) {
    if content.first() == Some(&b'\n') {
        return (Vec::new(), content[1..].to_vec());
    }

    match content.windows(2).position(|w| w == b"\n\n") {
        Some(pos) => {
            let head = content[..=pos].to_vec();
            let rest = &content[pos + 2..];
            let body = if rest.first() == Some(&b'\n') {
                let mut body = Vec::with_capacity(rest.len() + 1);
                body.push(b'\n');
                body.extend_from_slice(rest);
                body
            } else {
                rest.to_vec()
            };
            (head, body)
        }
        None => (content.to_vec(), Vec::new()),
    }
}
