//! MIME header parameters (RFC 2045 Section 5.1, RFC 2231)

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::codec::charset;

/// Characters allowed unescaped in an RFC 2231 extended value
const ATTRIBUTE_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// RFC 2045 tspecials
const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?=";

/// Ordered parameter list of a structured MIME header
///
/// Names compare case-insensitively; insertion order is kept so a
/// re-serialized header lists parameters the way they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

/// One `name[*N][*]=value` item before RFC 2231 reassembly
struct Section {
    base: String,
    index: u32,
    extended: bool,
    value: String,
}

impl Params {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the parameter part of a header value (everything after the
    /// first `;`)
    ///
    /// Quoted strings, RFC 2231 extended values (`name*=charset'lang'text`)
    /// and continuations (`name*0`, `name*1*`, ...) are decoded.
    pub fn parse(input: &str) -> Self {
        let mut params = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for (name, value) in tokenize(input) {
            let (name, extended) = match name.strip_suffix('*') {
                Some(stripped) => (stripped, true),
                None => (name.as_str(), false),
            };

            if let Some((base, index)) = name.rsplit_once('*')
                && let Ok(index) = index.parse::<u32>()
            {
                sections.push(Section {
                    base: base.to_string(),
                    index,
                    extended,
                    value,
                });
                continue;
            }

            let value = if extended {
                decode_extended(&value)
            } else {
                value
            };
            params.push((name.to_string(), value));
        }

        params.extend(join_sections(sections));
        Self(params)
    }

    /// Look up a parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a parameter, replacing an existing one in place
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    /// Remove a parameter, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(pos).1)
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all parameters
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Append `; name=value` for each parameter, 7-bit safe
    ///
    /// Values are written as tokens when possible, as quoted strings when
    /// they are ASCII, and as RFC 2231 UTF-8 extended values otherwise.
    pub fn write_to(&self, out: &mut String) {
        for (name, value) in &self.0 {
            out.push_str("; ");
            if !value.is_ascii() {
                let _ = write!(
                    out,
                    "{name}*=utf-8''{}",
                    utf8_percent_encode(value, ATTRIBUTE_CHAR)
                );
            } else if is_token(value) {
                let _ = write!(out, "{name}={value}");
            } else {
                let _ = write!(out, "{name}={}", quote(value));
            }
        }
    }
}

/// Check whether a value can be written without quoting
pub(crate) fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| (33..=126).contains(&b) && !TSPECIALS.contains(&b))
}

/// Wrap a value in a quoted-string, escaping `"` and `\`
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Split `a=b; c="d;e"` into raw name/value pairs
fn tokenize(input: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ';') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' {
                break;
            }
            name.push(c);
            chars.next();
        }
        let name = name.trim().to_string();

        if chars.peek() != Some(&'=') {
            // Attribute without a value; ignore it
            continue;
        }
        chars.next();

        while matches!(chars.peek(), Some(c) if *c == ' ' || *c == '\t') {
            chars.next();
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => value.push(c),
                }
            }
            // Skip anything between the closing quote and the next ';'
            while matches!(chars.peek(), Some(c) if *c != ';') {
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ';' {
                    break;
                }
                value.push(c);
                chars.next();
            }
            value = value.trim_end().to_string();
        }

        if !name.is_empty() {
            pairs.push((name, value));
        }
    }

    pairs
}

/// Decode `charset'language'percent-encoded-text`
fn decode_extended(value: &str) -> String {
    let mut parts = value.splitn(3, '\'');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cs), Some(_lang), Some(text)) => {
            let bytes: Vec<u8> = percent_decode_str(text).collect();
            bytes_to_string(&bytes, cs)
        }
        _ => value.to_string(),
    }
}

fn bytes_to_string(bytes: &[u8], label: &str) -> String {
    charset::decode(bytes, label).unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

/// Reassemble RFC 2231 continuations, in order of first appearance
fn join_sections(mut sections: Vec<Section>) -> Vec<(String, String)> {
    let mut order: Vec<String> = Vec::new();
    for section in &sections {
        if !order.iter().any(|b| b.eq_ignore_ascii_case(&section.base)) {
            order.push(section.base.clone());
        }
    }
    sections.sort_by_key(|s| s.index);

    order
        .into_iter()
        .map(|base| {
            let mut label = String::new();
            let mut bytes = Vec::new();
            for section in sections.iter().filter(|s| s.base.eq_ignore_ascii_case(&base)) {
                if !section.extended {
                    bytes.extend_from_slice(section.value.as_bytes());
                    continue;
                }
                let mut text = section.value.as_str();
                if section.index == 0
                    && let Some((cs, rest)) = text.split_once('\'')
                    && let Some((_lang, rest)) = rest.split_once('\'')
                {
                    label = cs.to_string();
                    text = rest;
                }
                bytes.extend(percent_decode_str(text));
            }
            let value = if label.is_empty() {
                String::from_utf8_lossy(&bytes).into_owned()
            } else {
                bytes_to_string(&bytes, &label)
            };
            (base, value)
        })
        .collect()
}
