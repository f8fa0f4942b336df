//! Detector for uuencoded files pasted into plain-text bodies
//!
//! Old news and mail software posted binaries as
//!
//! ```text
//! Some text
//! begin 644 picture.jpg
//! M_]C_X``02D9)1@`!`0$`2`!(``#_VP!#``,"`@,"`@,#`P,$`P,$!0@%!00$
//! ...
//! `
//! end
//! ```
//!
//! Large files were split across articles; the middle parts carry no
//! `begin`/`end` lines and the part number only shows in the subject,
//! e.g. `picture.jpg (2/5)`.

use std::sync::LazyLock;

use regex::Regex;
use regex::bytes::Regex as BytesRegex;
use tracing::trace;

use super::{BinaryPart, LegacyContent, PartialMarker, guess_mime_type};
use crate::codec::uuencode::is_data_line;
use crate::{MimeError, Result};

/// `begin <mode> <filename>` at the start of a line
static BEGIN_LINE: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(r"(?m)^begin [0-7]{3,4} ([^\r\n]*)").expect("valid begin-line pattern")
});

/// `n/m` part counter in a subject
static PART_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)/([0-9]+)").expect("valid part-counter pattern"));

/// Non-data lines tolerated inside one block (blank lines, signatures)
const MAX_FOREIGN_LINES: usize = 10;

/// Data lines needed to accept a block lacking `begin` or `end`
const MIN_HEADLESS_LINES: usize = 15;

/// Scan `body` for uuencoded blocks
///
/// `subject` is used to recover part numbers when a block lacks its `begin`
/// or `end` line. Each returned [`BinaryPart`] holds the still-encoded data
/// lines of one block. Fails when no block is found and the body is not a
/// recognizable part of a split file.
pub fn detect(body: &[u8], subject: Option<&str>) -> Result<LegacyContent> {
    let mut result = LegacyContent::default();
    let mut current = 0;
    let mut first_block = true;
    let mut part_counter = None;

    while current < body.len() {
        let (begin_pos, data_start, filename) = match BEGIN_LINE.captures_at(body, current) {
            Some(caps) => {
                let (Some(line), Some(name)) = (caps.get(0), caps.get(1)) else {
                    break;
                };
                // A begin line without a following line carries no data
                let Some(eol) = body[line.end()..].iter().position(|&b| b == b'\n') else {
                    break;
                };
                let name = String::from_utf8_lossy(name.as_bytes()).trim().to_string();
                (line.start(), line.end() + eol + 1, Some(name))
            }
            None => (current, current, None),
        };

        let end_pos = find_end_line(body, data_start.saturating_sub(1));
        let has_begin = filename.is_some();
        let has_end = end_pos.is_some();
        let end_pos = end_pos.unwrap_or(body.len()).max(data_start);

        // Only the first block may be a headless fragment of a split file
        if !(has_begin && has_end) && !first_block {
            break;
        }

        let block = &body[data_start..end_pos];
        let lines = if block.is_empty() {
            0
        } else {
            block.split(|&b| b == b'\n').count()
        };
        let data_lines = block
            .split(|&b| b == b'\n')
            .filter(|line| is_data_line(line))
            .count();

        if data_lines == 0
            || lines - data_lines > MAX_FOREIGN_LINES
            || (!(has_begin && has_end) && data_lines < MIN_HEADLESS_LINES)
        {
            break;
        }

        if !(has_begin && has_end) {
            // A fragment is only trusted when the subject numbers it
            match subject.and_then(parse_part_counter) {
                Some(counter) => part_counter = Some(counter),
                None => break,
            }
        }

        result.text.extend_from_slice(&body[current..begin_pos]);

        let filename = filename.unwrap_or_default();
        trace!(filename = %filename, lines = data_lines, "Found uuencoded block");
        result.binaries.push(BinaryPart {
            mime_type: guess_mime_type(&filename).to_string(),
            filename,
            data: body[data_start..(end_pos + 1).min(body.len())].to_vec(),
        });
        first_block = false;

        // Continue after the "end" line
        current = match body
            .get(end_pos + 1..)
            .and_then(|rest| rest.iter().position(|&b| b == b'\n'))
        {
            Some(idx) => end_pos + 1 + idx + 1,
            None => body.len(),
        };
    }

    result.text.extend_from_slice(&body[current.min(body.len())..]);

    if let Some(counter) = part_counter
        && counter.total != 1
    {
        result.partial = Some(counter);
    }

    if result.binaries.is_empty() && result.partial.is_none() {
        return Err(MimeError::Malformed("No uuencoded data found".to_string()));
    }
    Ok(result)
}

/// Offset of the LF that precedes the next `end` line at or after `from`
fn find_end_line(body: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = body.get(pos..)?.windows(4).position(|w| w == b"\nend") {
        let lf = pos + offset;
        if matches!(body.get(lf + 4), None | Some(b' ' | b'\t' | b'\r' | b'\n')) {
            return Some(lf);
        }
        pos = lf + 1;
    }
    None
}

fn parse_part_counter(subject: &str) -> Option<PartialMarker> {
    let caps = PART_COUNTER.captures(subject)?;
    Some(PartialMarker {
        number: caps.get(1)?.as_str().parse().ok()?,
        total: caps.get(2)?.as_str().parse().ok()?,
    })
}
