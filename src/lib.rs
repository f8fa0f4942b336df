#![doc = include_str!("../README.md")]

/// Transfer codecs and charset conversion
pub mod codec;
/// MIME content tree: parsing, editing and serialization
pub mod content;
mod config;
/// RFC 2047 Encoded Words support for international headers
pub mod encoded_words;
mod error;
/// MIME header objects
pub mod headers;
/// Legacy body format detectors and the multipart splitter
pub mod parsers;
/// yEnc block decoding for Usenet binaries
pub mod yenc;

pub use config::MimeConfig;
pub use content::{Body, ContentId, ContentIndex, ContentTree};
pub use error::{MimeError, Result};
pub use headers::{
    ContentCategory, ContentDisposition, ContentTransferEncoding, ContentType, Disposition,
    Encoding, Header,
};
