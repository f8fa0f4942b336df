//! yEnc block decoding
//!
//! yEnc is a binary-to-text encoding scheme designed specifically for Usenet.
//! It has only 1-2% overhead compared to 33-40% for Base64. Posters embed
//! yEnc blocks in plain-text bodies instead of using MIME; the
//! [yEnc detector](crate::parsers::yenc) finds those blocks and hands each one
//! to [`decode`].
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt

pub mod decode;
mod params;
pub mod types;

pub use decode::decode;
pub use types::{DEFAULT_LINE_LENGTH, YencDecoded, YencEnd, YencHeader, YencPart};
