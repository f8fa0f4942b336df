//! Quoted-Printable body encoding (RFC 2045 Section 6.7)

/// Longest encoded line, excluding the soft line break marker
const MAX_LINE: usize = 76;

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Encode bytes as quoted-printable
///
/// LF (or CRLF) in the input is kept as a hard line break, written as LF.
/// Lines longer than 76 columns get soft breaks (`=\n`). Whitespace at the end
/// of a line is escaped so transports cannot strip it.
///
/// # Example
///
/// ```
/// use nntp_mime::codec::quoted_printable;
///
/// assert_eq!(quoted_printable::encode(b"Caf\xe9 = 1\n"), b"Caf=E9 =3D 1\n");
/// ```
pub fn encode(input: &[u8]) -> Vec<u8> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = Vec::with_capacity(input.len() + input.len() / 8);
    for (idx, line) in input.split(|&b| b == b'\n').enumerate() {
        if idx > 0 {
            out.push(b'\n');
        }
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let mut column = 0;
        for (i, &byte) in line.iter().enumerate() {
            let last = i + 1 == line.len();
            let escape = byte == b'='
                || !(byte == b'\t' || (b' '..=b'~').contains(&byte))
                || (last && (byte == b' ' || byte == b'\t'));
            let width = if escape { 3 } else { 1 };

            // Reserve one column for the soft break, unless this is the last
            // byte of the line and it fits exactly
            if column + width >= MAX_LINE && !(last && column + width <= MAX_LINE) {
                out.extend_from_slice(b"=\n");
                column = 0;
            }

            if escape {
                out.push(b'=');
                out.push(HEX[(byte >> 4) as usize]);
                out.push(HEX[(byte & 0x0f) as usize]);
            } else {
                out.push(byte);
            }
            column += width;
        }
    }
    out
}

/// Decode quoted-printable
///
/// Encoded bytes and soft line breaks (LF and CRLF, optionally preceded by
/// transport-added whitespace) are handled. Never fails: invalid escape
/// sequences are passed through untransformed.
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        // Soft line break, possibly with trailing whitespace before it
        let mut j = i + 1;
        while j < input.len() && (input[j] == b' ' || input[j] == b'\t') {
            j += 1;
        }
        match input.get(j) {
            Some(b'\n') => {
                i = j + 1;
                continue;
            }
            Some(b'\r') if input.get(j + 1) == Some(&b'\n') => {
                i = j + 2;
                continue;
            }
            _ => {}
        }

        match (
            input.get(i + 1).copied().and_then(hex_value),
            input.get(i + 2).copied().and_then(hex_value),
        ) {
            (Some(high), Some(low)) => {
                out.push((high << 4) | low);
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}
