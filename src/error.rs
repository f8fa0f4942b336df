//! MIME content error types

use thiserror::Error;

use crate::headers::Encoding;

/// Errors raised by content-tree operations and format detectors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MimeError {
    /// Tree mutation or encoding change attempted on a message/rfc822 node
    ///
    /// Encapsulated messages are always 7-bit and never gain multipart children.
    #[error("Operation not permitted on an encapsulated message")]
    EncapsulatedMessage,

    /// Non-textual content can only be converted to base64
    #[error("Cannot convert non-text content to {0}")]
    UnsupportedEncoding(Encoding),

    /// Re-parenting would make a node its own ancestor
    #[error("Content cannot be added below itself")]
    CyclicContent,

    /// Preamble/epilogue edits need a multipart node
    #[error("Content is not multipart")]
    NotMultipart,

    /// Input did not match the expected format
    #[error("Malformed input: {0}")]
    Malformed(String),
}

/// Result type alias using MimeError
pub type Result<T> = std::result::Result<T, MimeError>;
