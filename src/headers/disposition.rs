//! Content-Disposition header (RFC 2183)

use super::params::Params;
use super::{Header, TypedHeader, names};

/// Presentation style of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Displayed as part of the message
    #[default]
    Inline,
    /// Separate from the main body
    Attachment,
    /// Displayed alongside sibling parts
    Parallel,
}

impl Disposition {
    /// Header token
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
            Disposition::Parallel => "parallel",
        }
    }
}

/// Content-Disposition header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDisposition {
    disposition: Option<Disposition>,
    params: Params,
}

impl ContentDisposition {
    /// Create a header with the given disposition
    pub fn new(disposition: Disposition) -> Self {
        Self {
            disposition: Some(disposition),
            params: Params::new(),
        }
    }

    /// Parse a header value
    ///
    /// Unknown disposition types are treated as `attachment` (RFC 2183
    /// Section 2.8).
    pub fn parse(value: &str) -> Self {
        let (token, params) = match value.split_once(';') {
            Some((token, params)) => (token, Params::parse(params)),
            None => (value, Params::new()),
        };
        let token = token.trim().to_ascii_lowercase();
        let disposition = match token.as_str() {
            "" => None,
            "inline" => Some(Disposition::Inline),
            "parallel" => Some(Disposition::Parallel),
            _ => Some(Disposition::Attachment),
        };
        Self {
            disposition,
            params,
        }
    }

    /// Declared disposition, `inline` when none was given
    pub fn disposition(&self) -> Disposition {
        self.disposition.unwrap_or_default()
    }

    /// Set the disposition
    pub fn set_disposition(&mut self, disposition: Disposition) {
        self.disposition = Some(disposition);
    }

    /// Suggested file name
    pub fn filename(&self) -> Option<&str> {
        self.params.get("filename").filter(|f| !f.is_empty())
    }

    /// Set the suggested file name
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.params.set("filename", filename);
    }

    /// Parameter list
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable parameter list
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Check if no disposition is declared
    pub fn is_empty(&self) -> bool {
        self.disposition.is_none()
    }

    /// Serialize as `Content-Disposition: type; params`
    pub fn as_7bit_string(&self) -> String {
        let mut out = format!(
            "{}: {}",
            names::CONTENT_DISPOSITION,
            self.disposition().as_str()
        );
        self.params.write_to(&mut out);
        out
    }
}

impl TypedHeader for ContentDisposition {
    const NAME: &'static str = names::CONTENT_DISPOSITION;

    fn from_header(header: &Header) -> Option<&Self> {
        match header {
            Header::ContentDisposition(h) => Some(h),
            _ => None,
        }
    }

    fn coerce_mut(header: &mut Header) -> &mut Self {
        match header {
            Header::ContentDisposition(h) => h,
            other => {
                *other = Header::ContentDisposition(Self::default());
                Self::coerce_mut(other)
            }
        }
    }

    fn into_header(self) -> Header {
        Header::ContentDisposition(self)
    }
}
