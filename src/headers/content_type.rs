//! Content-Type header (RFC 2045 Section 5)

use super::params::Params;
use super::{Header, TypedHeader, names};

/// Role of a part inside its parent, used when listing attachments
///
/// Never serialized; it is derived from the surrounding structure while
/// parsing or editing the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentCategory {
    /// Standalone part
    #[default]
    Single,
    /// Multipart node holding other parts
    Container,
    /// Child of a multipart/mixed (or any non-alternative multipart)
    MixedPart,
    /// Child of a multipart/alternative
    AlternativePart,
}

/// Content-Type header
///
/// ```
/// use nntp_mime::headers::ContentType;
///
/// let ct = ContentType::parse("Multipart/Mixed; boundary=\"=_x\"");
/// assert!(ct.is_multipart());
/// assert_eq!(ct.mime_type(), "multipart/mixed");
/// assert_eq!(ct.boundary(), Some("=_x"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentType {
    media_type: String,
    sub_type: String,
    params: Params,
    category: ContentCategory,
}

impl ContentType {
    /// Create a header with the given `type/subtype`
    pub fn new(mime_type: &str) -> Self {
        let mut ct = Self::default();
        ct.set_mime_type(mime_type);
        ct
    }

    /// Parse a header value
    pub fn parse(value: &str) -> Self {
        let (mime_type, params) = match value.split_once(';') {
            Some((mime_type, params)) => (mime_type, Params::parse(params)),
            None => (value, Params::new()),
        };
        let mut ct = Self {
            params,
            ..Self::default()
        };
        ct.set_mime_type(mime_type);
        ct
    }

    /// `type/subtype`, lowercase; empty when no type is declared
    pub fn mime_type(&self) -> String {
        if self.media_type.is_empty() {
            return String::new();
        }
        format!("{}/{}", self.media_type, self.sub_type)
    }

    /// Replace the `type/subtype`, keeping parameters
    pub fn set_mime_type(&mut self, mime_type: &str) {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        match mime_type.split_once('/') {
            Some((media, sub)) => {
                self.media_type = media.trim().to_string();
                self.sub_type = sub.trim().to_string();
            }
            None => {
                self.media_type = mime_type;
                self.sub_type.clear();
            }
        }
    }

    /// Top-level media type (`text` in `text/plain`)
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Subtype (`plain` in `text/plain`)
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// Check if no type is declared
    pub fn is_empty(&self) -> bool {
        self.media_type.is_empty()
    }

    /// Check if this is `type/subtype`, case-insensitively
    pub fn is_mime_type(&self, mime_type: &str) -> bool {
        self.mime_type().eq_ignore_ascii_case(mime_type.trim())
    }

    /// Check the top-level media type, case-insensitively
    pub fn is_media_type(&self, media_type: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type)
    }

    /// Check the subtype, case-insensitively
    pub fn is_sub_type(&self, sub_type: &str) -> bool {
        self.sub_type.eq_ignore_ascii_case(sub_type)
    }

    /// Text, or no declared type at all (RFC 2045 Section 5.2 default)
    pub fn is_text(&self) -> bool {
        self.is_empty() || self.media_type == "text"
    }

    /// Check if this is `text/plain`
    pub fn is_plain_text(&self) -> bool {
        self.is_mime_type("text/plain")
    }

    /// Check if this is any `multipart/*`
    pub fn is_multipart(&self) -> bool {
        self.media_type == "multipart"
    }

    /// Check if this is `message/partial`
    pub fn is_partial(&self) -> bool {
        self.is_mime_type("message/partial")
    }

    /// Parameter list
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable parameter list
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Multipart boundary token
    pub fn boundary(&self) -> Option<&str> {
        self.params.get("boundary").filter(|b| !b.is_empty())
    }

    /// Set the multipart boundary token
    pub fn set_boundary(&mut self, boundary: impl Into<String>) {
        self.params.set("boundary", boundary);
    }

    /// Declared charset
    pub fn charset(&self) -> Option<&str> {
        self.params.get("charset").filter(|c| !c.is_empty())
    }

    /// Set the charset
    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.params.set("charset", charset);
    }

    /// Legacy `name` parameter, used for attachment file names
    pub fn name(&self) -> Option<&str> {
        self.params.get("name").filter(|n| !n.is_empty())
    }

    /// Set the `name` parameter
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.params.set("name", name);
    }

    /// Set `number`/`total` parameters of a `message/partial` type
    pub fn set_partial_params(&mut self, total: u32, number: u32) {
        self.params.set("number", number.to_string());
        self.params.set("total", total.to_string());
    }

    /// `number` parameter of a `message/partial` type
    pub fn partial_number(&self) -> Option<u32> {
        self.params.get("number")?.trim().parse().ok()
    }

    /// `total` parameter of a `message/partial` type
    pub fn partial_count(&self) -> Option<u32> {
        self.params.get("total")?.trim().parse().ok()
    }

    /// Structural role of the part
    pub fn category(&self) -> ContentCategory {
        self.category
    }

    /// Set the structural role of the part
    pub fn set_category(&mut self, category: ContentCategory) {
        self.category = category;
    }

    /// Reset type and parameters; the category is kept
    pub fn clear(&mut self) {
        self.media_type.clear();
        self.sub_type.clear();
        self.params.clear();
    }

    /// Serialize as `Content-Type: type/subtype; params`
    pub fn as_7bit_string(&self) -> String {
        let mut out = format!("{}: {}", names::CONTENT_TYPE, self.mime_type());
        self.params.write_to(&mut out);
        out
    }
}

impl TypedHeader for ContentType {
    const NAME: &'static str = names::CONTENT_TYPE;

    fn from_header(header: &Header) -> Option<&Self> {
        match header {
            Header::ContentType(h) => Some(h),
            _ => None,
        }
    }

    fn coerce_mut(header: &mut Header) -> &mut Self {
        match header {
            Header::ContentType(h) => h,
            other => {
                *other = Header::ContentType(Self::default());
                Self::coerce_mut(other)
            }
        }
    }

    fn into_header(self) -> Header {
        Header::ContentType(self)
    }
}
