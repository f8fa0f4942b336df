//! Detector for yEnc blocks pasted into plain-text bodies
//!
//! A yEnc post carries one or more `=ybegin` ... `=yend` blocks, possibly
//! surrounded by text. A block with a `=ypart` line is one piece of a file
//! split across several articles; scanning stops after such a block.

use tracing::{debug, trace, warn};

use super::{BinaryPart, LegacyContent, PartialMarker, guess_mime_type};
use crate::yenc::{self, YencDecoded};
use crate::{MimeError, Result};

/// Scan `body` for yEnc blocks and decode them
///
/// Blocks that fail to decode, or whose decoded size disagrees with their
/// headers, are left in the text portion. A CRC mismatch is logged but the
/// data is kept. Fails when no block decodes.
pub fn detect(body: &[u8]) -> Result<LegacyContent> {
    let mut result = LegacyContent::default();
    let mut current = 0;

    while current < body.len() {
        let Some(begin_pos) = find_at_line_start(body, b"=ybegin ", current) else {
            break;
        };
        let Some(end_pos) = find_at_line_start(body, b"=yend ", begin_pos) else {
            break;
        };
        let block_end = body[end_pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |idx| end_pos + idx + 1);

        let decoded = match yenc::decode(&body[begin_pos..block_end]) {
            Ok(decoded) if sizes_agree(&decoded) => decoded,
            Ok(decoded) => {
                debug!(
                    name = %decoded.header.name,
                    expected = decoded.expected_size(),
                    actual = decoded.data.len(),
                    "yEnc block size mismatch, keeping it as text"
                );
                result.text.extend_from_slice(&body[current..block_end]);
                current = block_end;
                continue;
            }
            Err(e) => {
                debug!(error = %e, "Undecodable yEnc block, keeping it as text");
                result.text.extend_from_slice(&body[current..block_end]);
                current = block_end;
                continue;
            }
        };

        if decoded.verify_crc32() == Some(false) {
            warn!(
                name = %decoded.header.name,
                crc32 = format_args!("{:08x}", decoded.calculated_crc32),
                "yEnc CRC32 mismatch"
            );
        }
        trace!(name = %decoded.header.name, size = decoded.data.len(), "Found yEnc block");

        result.text.extend_from_slice(&body[current..begin_pos]);
        current = block_end;

        let is_fragment = decoded.is_multipart()
            && decoded.header.total != Some(1)
            && decoded.expected_size() < decoded.header.size;
        let marker = PartialMarker {
            number: decoded.header.part.unwrap_or(1),
            total: decoded.header.total.unwrap_or(0),
        };
        let multipart = decoded.is_multipart();

        result.binaries.push(BinaryPart {
            mime_type: guess_mime_type(&decoded.header.name).to_string(),
            filename: decoded.header.name,
            data: decoded.data,
        });

        if multipart {
            if is_fragment {
                result.partial = Some(marker);
            }
            break;
        }
    }

    result.text.extend_from_slice(&body[current.min(body.len())..]);

    if result.binaries.is_empty() {
        return Err(MimeError::Malformed("No yEnc data found".to_string()));
    }
    Ok(result)
}

fn sizes_agree(decoded: &YencDecoded) -> bool {
    let actual = decoded.data.len() as u64;
    actual == decoded.expected_size() && actual == decoded.trailer.size
}

/// Offset of `needle` at the start of a line, at or after `from`
fn find_at_line_start(body: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos + needle.len() <= body.len() {
        let offset = body[pos..]
            .windows(needle.len())
            .position(|w| w == needle)?;
        let start = pos + offset;
        if start == 0 || body[start - 1] == b'\n' {
            return Some(start);
        }
        pos = start + 1;
    }
    None
}
