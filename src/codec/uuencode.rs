//! Unix-to-Unix encoding
//!
//! Each line starts with a length character followed by groups of four
//! characters carrying three bytes each. Values are offset by 32, with zero
//! written as a backtick. A zero-length line terminates the data.

/// Bytes carried by one full line
const LINE_BYTES: usize = 45;

fn encode_char(value: u8) -> u8 {
    let value = value & 0x3f;
    if value == 0 { b'`' } else { value + 32 }
}

fn decode_char(ch: u8) -> u8 {
    ch.wrapping_sub(32) & 0x3f
}

/// Encode bytes as uuencoded lines
///
/// The output holds only the data lines plus the zero-length terminator line;
/// `begin`/`end` framing is left to the caller.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 4 / 3 + input.len() / LINE_BYTES * 2 + 4);

    for chunk in input.chunks(LINE_BYTES) {
        out.push(encode_char(chunk.len() as u8));
        for group in chunk.chunks(3) {
            let b0 = group[0];
            let b1 = group.get(1).copied().unwrap_or(0);
            let b2 = group.get(2).copied().unwrap_or(0);
            out.push(encode_char(b0 >> 2));
            out.push(encode_char(((b0 & 0x03) << 4) | (b1 >> 4)));
            out.push(encode_char(((b1 & 0x0f) << 2) | (b2 >> 6)));
            out.push(encode_char(b2));
        }
        out.push(b'\n');
    }
    out.extend_from_slice(b"`\n");
    out
}

/// Decode uuencoded data
///
/// An optional leading `begin <mode> <name>` line is skipped. Decoding stops
/// at an `end` line or a zero-length line. Never fails: short lines yield
/// as many bytes as they carry.
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 3 / 4);
    let mut seen_data = false;

    for line in input.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        if !seen_data && line.starts_with(b"begin ") {
            continue;
        }
        if line.trim_ascii_end() == b"end" {
            break;
        }

        let count = decode_char(line[0]) as usize;
        if count == 0 {
            break;
        }
        seen_data = true;

        let mut remaining = count;
        for group in line[1..].chunks(4) {
            if remaining == 0 {
                break;
            }
            let c = |i: usize| decode_char(group.get(i).copied().unwrap_or(b'`'));
            let bytes = [
                (c(0) << 2) | (c(1) >> 4),
                (c(1) << 4) | (c(2) >> 2),
                (c(2) << 6) | c(3),
            ];
            let take = remaining.min(3);
            out.extend_from_slice(&bytes[..take]);
            remaining -= take;
        }
    }

    out
}

/// Check whether a line is shaped like uuencoded data
///
/// The length character must agree with the number of encoded characters
/// that follow. Some encoders pad lines or drop trailing backticks, so one
/// group of slack is allowed either way.
pub fn is_data_line(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let Some(&first) = line.first() else {
        return false;
    };
    if !(b' '..=b'`').contains(&first) {
        return false;
    }
    if !line[1..].iter().all(|b| (b' '..=b'`').contains(b)) {
        return false;
    }
    let count = decode_char(first) as usize;
    let expected = count.div_ceil(3) * 4;
    let actual = line.len() - 1;
    actual + 4 >= expected && actual <= expected + 4
}
