use std::collections::HashMap;
use std::str::FromStr;

use super::types::{DEFAULT_LINE_LENGTH, YencEnd, YencHeader, YencPart};
use crate::{MimeError, Result};

/// `key=value` pairs of one keyword line
struct KeywordLine<'a>(HashMap<&'a str, &'a str>);

impl<'a> KeywordLine<'a> {
    fn parse(params: &'a str) -> Self {
        Self(
            params
                .split_ascii_whitespace()
                .filter_map(|item| item.split_once('='))
                .filter(|(key, _)| !key.is_empty())
                .collect(),
        )
    }

    fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(|value| value.parse().ok())
    }

    fn require<T: FromStr>(&self, key: &str) -> Result<T> {
        self.get(key)
            .ok_or_else(|| MimeError::Malformed(format!("Missing '{key}' parameter")))
    }

    fn hex(&self, key: &str) -> Option<u32> {
        self.0
            .get(key)
            .and_then(|value| u32::from_str_radix(value, 16).ok())
    }
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Result<&'a str> {
    line.strip_prefix(keyword)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or_else(|| MimeError::Malformed(format!("Expected {keyword} line: {line}")))
}

/// Parse a `=ybegin` line
///
/// `=ybegin [part=N total=M] [line=128] size=S name=...`. The name comes
/// last and runs to the end of the line, spaces included.
pub(crate) fn parse_ybegin(line: &str) -> Result<YencHeader> {
    let rest = strip_keyword(line, "=ybegin")?;
    let (params, name) = rest
        .split_once("name=")
        .ok_or_else(|| MimeError::Malformed("Missing 'name' parameter".to_string()))?;
    let params = KeywordLine::parse(params);

    Ok(YencHeader {
        line: params.get("line").unwrap_or(DEFAULT_LINE_LENGTH),
        size: params.require("size")?,
        name: name.trim_end().to_string(),
        part: params.get("part"),
        total: params.get("total"),
    })
}

/// Parse a `=ypart begin=B end=E` line
pub(crate) fn parse_ypart(line: &str) -> Result<YencPart> {
    let params = KeywordLine::parse(strip_keyword(line, "=ypart")?);
    Ok(YencPart {
        begin: params.require("begin")?,
        end: params.require("end")?,
    })
}

/// Parse a `=yend size=S [part=N] [pcrc32=H] [crc32=H]` line
pub(crate) fn parse_yend(line: &str) -> Result<YencEnd> {
    let params = KeywordLine::parse(strip_keyword(line, "=yend")?);
    Ok(YencEnd {
        size: params.require("size")?,
        crc32: params.hex("crc32"),
        pcrc32: params.hex("pcrc32"),
    })
}
