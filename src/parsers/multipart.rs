//! Multipart body splitter (RFC 2046 Section 5.1.1)
//!
//! ```text
//! preamble
//! --boundary
//! part 1
//! --boundary
//! part 2
//! --boundary--
//! epilogue
//! ```
//!
//! The split is lossless: every byte of the body ends up in exactly one of
//! preamble, a part, a delimiter line, or epilogue. The line break that ends
//! a part's last line stays with the part, so re-inserting delimiter lines
//! reproduces the input.

use crate::{MimeError, Result};

/// Sections of a multipart body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiPart {
    /// Bytes before the first delimiter line
    pub preamble: Vec<u8>,
    /// Raw bytes of each body part, headers included
    pub parts: Vec<Vec<u8>>,
    /// Bytes after the closing delimiter line
    pub epilogue: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelimiterKind {
    Open,
    Close,
}

#[derive(Debug)]
struct Delimiter {
    kind: DelimiterKind,
    /// Offset of the leading `--`
    start: usize,
    /// Offset just past the delimiter line's LF
    next_line: usize,
}

/// Split a multipart body at `boundary`
///
/// A missing closing delimiter is tolerated; the last part then runs to the
/// end of the body. Fails when the body has no opening delimiter line.
///
/// # Example
///
/// ```
/// use nntp_mime::parsers::multipart;
///
/// let body = b"intro\n--b\n\nfirst\n--b\n\nsecond\n--b--\nbye\n";
/// let split = multipart::split(body, "b").unwrap();
/// assert_eq!(split.preamble, b"intro\n");
/// assert_eq!(split.parts, vec![b"\nfirst\n".to_vec(), b"\nsecond\n".to_vec()]);
/// assert_eq!(split.epilogue, b"bye\n");
/// ```
pub fn split(body: &[u8], boundary: &str) -> Result<MultiPart> {
    if boundary.is_empty() {
        return Err(MimeError::Malformed("Empty multipart boundary".to_string()));
    }
    let dash_boundary = format!("--{boundary}").into_bytes();

    let first = find_delimiter(body, &dash_boundary, 0).ok_or_else(|| {
        MimeError::Malformed(format!("Boundary '{boundary}' not found in body"))
    })?;
    if first.kind == DelimiterKind::Close {
        return Err(MimeError::Malformed(format!(
            "Only a closing delimiter for boundary '{boundary}'"
        )));
    }

    let mut result = MultiPart {
        preamble: body[..first.start].to_vec(),
        ..MultiPart::default()
    };

    let mut cursor = first.next_line;
    loop {
        match find_delimiter(body, &dash_boundary, cursor) {
            Some(delimiter) => {
                result.parts.push(body[cursor..delimiter.start].to_vec());
                cursor = delimiter.next_line;
                if delimiter.kind == DelimiterKind::Close {
                    result.epilogue = body[cursor..].to_vec();
                    break;
                }
            }
            None => {
                result.parts.push(body[cursor..].to_vec());
                break;
            }
        }
    }

    Ok(result)
}

/// Find the next delimiter line at or after `from`
///
/// A delimiter starts a line and is followed by `--` (closing), transport
/// padding, a line break, or the end of the body.
fn find_delimiter(body: &[u8], dash_boundary: &[u8], from: usize) -> Option<Delimiter> {
    let mut pos = from;
    while pos + dash_boundary.len() <= body.len() {
        let offset = body[pos..]
            .windows(dash_boundary.len())
            .position(|w| w == dash_boundary)?;
        let start = pos + offset;
        let at_line_start = start == 0 || body[start - 1] == b'\n';

        if at_line_start {
            let after = start + dash_boundary.len();
            let (kind, tail) = if body[after..].starts_with(b"--") {
                (DelimiterKind::Close, after + 2)
            } else {
                (DelimiterKind::Open, after)
            };

            if matches!(body.get(tail), None | Some(b' ' | b'\t' | b'\r' | b'\n')) {
                let next_line = body[tail..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(body.len(), |idx| tail + idx + 1);
                return Some(Delimiter {
                    kind,
                    start,
                    next_line,
                });
            }
        }

        pos = start + 1;
    }
    None
}
