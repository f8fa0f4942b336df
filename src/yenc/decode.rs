use std::borrow::Cow;

use crate::{MimeError, Result};
use crc32fast::Hasher;

use super::params::{parse_ybegin, parse_yend, parse_ypart};
use super::types::YencDecoded;

/// Decode one yEnc block
///
/// # Arguments
/// * `input` - one block, from its `=ybegin` line through its `=yend` line
///
/// # Returns
/// Decoded binary data with header/trailer information
///
/// # Example
/// ```
/// use nntp_mime::yenc;
///
/// // "Hi" is 0x48 0x69, shifted by 42
/// let block = b"=ybegin line=128 size=2 name=hi.txt\n\x72\x93\n=yend size=2\n";
/// let decoded = yenc::decode(block).unwrap();
/// assert_eq!(decoded.data, b"Hi");
/// assert_eq!(decoded.header.name, "hi.txt");
/// ```
pub fn decode(input: &[u8]) -> Result<YencDecoded> {
    let mut lines = input
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .peekable();

    let first = lines
        .next()
        .filter(|line| !line.is_empty())
        .ok_or_else(|| MimeError::Malformed("Empty yEnc input".to_string()))?;
    let header = parse_ybegin(&control_line(first))?;

    let part = match lines.next_if(|line| line.starts_with(b"=ypart ")) {
        Some(line) => Some(parse_ypart(&control_line(line))?),
        None => None,
    };

    let mut data = Vec::with_capacity(header.size.min(input.len() as u64) as usize);
    let mut hasher = Hasher::new();
    for line in lines {
        if line.starts_with(b"=yend ") {
            let trailer = parse_yend(&control_line(line))?;
            return Ok(YencDecoded {
                header,
                part,
                trailer,
                data,
                calculated_crc32: hasher.finalize(),
            });
        }
        let start = data.len();
        unshift_line(line, &mut data)?;
        hasher.update(&data[start..]);
    }

    Err(MimeError::Malformed("Missing =yend trailer".to_string()))
}

/// Keyword lines are plain ASCII apart from the file name, which may be
/// in any 8-bit charset; decode that lossily
fn control_line(line: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(line)
}

/// Undo the yEnc shift for one data line, appending to `output`
///
/// Plain bytes were written as `byte + 42`; critical bytes as `=` followed
/// by `byte + 42 + 64`.
fn unshift_line(line: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut bytes = line.iter();
    while let Some(&byte) = bytes.next() {
        let shifted = if byte == b'=' {
            let &escaped = bytes.next().ok_or_else(|| {
                MimeError::Malformed("Incomplete escape sequence at end of line".to_string())
            })?;
            escaped.wrapping_sub(64)
        } else {
            byte
        };
        output.push(shifted.wrapping_sub(42));
    }
    Ok(())
}
