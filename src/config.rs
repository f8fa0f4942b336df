//! Content tree configuration

/// Settings shared by every node of a [`ContentTree`](crate::ContentTree)
///
/// # Example
///
/// ```
/// use nntp_mime::MimeConfig;
///
/// // Recommended: start from the defaults
/// let config = MimeConfig::default().with_default_charset("UTF-8");
///
/// // Or construct manually
/// let config = MimeConfig {
///     default_charset: "ISO-8859-1".to_string(),
///     fold_width: 78,
///     max_depth: 64,
///     boundary_prefix: "nntp-mime-".to_string(),
/// };
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MimeConfig {
    /// Charset used when a part declares one that cannot be resolved
    ///
    /// The part's declared charset is rewritten to this value when the
    /// fallback is taken, so the stored content stays self-consistent.
    ///
    /// Default: `ISO-8859-1`
    pub default_charset: String,

    /// Target maximum length of a serialized header line
    ///
    /// Lines without whitespace to break at may still exceed it.
    ///
    /// Default: 78 (RFC 5322 Section 2.1.1)
    pub fold_width: usize,

    /// Maximum nesting depth decomposed by `parse()`
    ///
    /// Multipart and message/rfc822 bodies nested deeper than this stay
    /// opaque leaves.
    ///
    /// Default: 64
    pub max_depth: usize,

    /// Prefix of generated multipart boundary tokens
    ///
    /// A random UUID is appended to make each token unique.
    ///
    /// Default: `nntp-mime-`
    pub boundary_prefix: String,
}

impl Default for MimeConfig {
    fn default() -> Self {
        Self {
            default_charset: "ISO-8859-1".to_string(),
            fold_width: 78,
            max_depth: 64,
            boundary_prefix: "nntp-mime-".to_string(),
        }
    }
}

impl MimeConfig {
    /// Set the fallback charset
    pub fn with_default_charset(mut self, charset: impl Into<String>) -> Self {
        self.default_charset = charset.into();
        self
    }

    /// Set the header folding width
    pub fn with_fold_width(mut self, width: usize) -> Self {
        self.fold_width = width;
        self
    }

    /// Set the maximum decomposition depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the boundary prefix
    pub fn with_boundary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.boundary_prefix = prefix.into();
        self
    }

    /// Generate a fresh multipart boundary token
    pub fn new_boundary(&self) -> String {
        let uuid = uuid::Uuid::new_v4();
        format!("{}{}", self.boundary_prefix, uuid.simple())
    }
}
