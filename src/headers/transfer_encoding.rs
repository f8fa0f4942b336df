//! Content-Transfer-Encoding header (RFC 2045 Section 6)

use std::fmt;

use super::{TypedHeader, names};
use crate::headers::Header;

/// Declared transfer encoding of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// 7-bit text, stored as-is
    #[default]
    SevenBit,
    /// 8-bit text, stored as-is
    EightBit,
    /// Quoted-printable
    QuotedPrintable,
    /// Base64
    Base64,
    /// Traditional uuencode, as emitted by legacy news software
    UuEncode,
    /// Raw binary, no transformation
    Binary,
}

impl Encoding {
    /// Canonical header token
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::SevenBit => "7bit",
            Encoding::EightBit => "8bit",
            Encoding::QuotedPrintable => "quoted-printable",
            Encoding::Base64 => "base64",
            Encoding::UuEncode => "x-uuencode",
            Encoding::Binary => "binary",
        }
    }

    /// Parse a header token, case-insensitively
    ///
    /// Returns `None` for tokens this crate does not know.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let encoding = match token.as_str() {
            "7bit" => Encoding::SevenBit,
            "8bit" => Encoding::EightBit,
            "quoted-printable" => Encoding::QuotedPrintable,
            "base64" => Encoding::Base64,
            "x-uuencode" | "uuencode" | "x-uue" => Encoding::UuEncode,
            "binary" => Encoding::Binary,
            _ => return None,
        };
        Some(encoding)
    }

    /// Whether bodies with this encoding are held decoded right after parsing
    pub fn is_identity(&self) -> bool {
        matches!(self, Encoding::SevenBit | Encoding::EightBit)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-Transfer-Encoding header
///
/// Unknown tokens behave as 7bit but keep their original spelling so an
/// unmodified header re-serializes unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTransferEncoding {
    encoding: Encoding,
    unknown_token: Option<String>,
}

impl ContentTransferEncoding {
    /// Create a header declaring `encoding`
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            unknown_token: None,
        }
    }

    /// Parse a header value
    pub fn parse(value: &str) -> Self {
        let token = value.split(';').next().unwrap_or_default().trim();
        match Encoding::from_token(token) {
            Some(encoding) => Self::new(encoding),
            None => Self {
                encoding: Encoding::SevenBit,
                unknown_token: (!token.is_empty()).then(|| token.to_string()),
            },
        }
    }

    /// Declared encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Change the declared encoding
    ///
    /// Only the declaration changes; converting body bytes is the job of
    /// [`ContentTree::change_encoding`](crate::ContentTree::change_encoding).
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
        self.unknown_token = None;
    }

    /// Header token as written on the wire
    pub fn token(&self) -> &str {
        self.unknown_token.as_deref().unwrap_or(self.encoding.as_str())
    }

    /// Serialize as `Content-Transfer-Encoding: token`
    pub fn as_7bit_string(&self) -> String {
        format!("{}: {}", names::CONTENT_TRANSFER_ENCODING, self.token())
    }
}

impl TypedHeader for ContentTransferEncoding {
    const NAME: &'static str = names::CONTENT_TRANSFER_ENCODING;

    fn from_header(header: &Header) -> Option<&Self> {
        match header {
            Header::ContentTransferEncoding(h) => Some(h),
            _ => None,
        }
    }

    fn coerce_mut(header: &mut Header) -> &mut Self {
        match header {
            Header::ContentTransferEncoding(h) => h,
            other => {
                *other = Header::ContentTransferEncoding(Self::default());
                Self::coerce_mut(other)
            }
        }
    }

    fn into_header(self) -> Header {
        Header::ContentTransferEncoding(self)
    }
}
