//! Body format detectors
//!
//! Each detector either recognizes its format and returns structured output,
//! or fails with [`MimeError::Malformed`](crate::MimeError::Malformed). The
//! parse pipeline treats failure as "not this format" and moves on.
//!
//! - [`multipart`]: boundary splitter for `multipart/*` bodies
//! - [`uuencode`]: `begin`/`end` blocks pasted into plain text
//! - [`yenc`]: `=ybegin`/`=yend` blocks pasted into plain text

pub mod multipart;
pub mod uuencode;
pub mod yenc;

/// A file recovered from a legacy-encoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    /// File name as announced by the encoder
    pub filename: String,
    /// MIME type guessed from the file name
    pub mime_type: String,
    /// Payload bytes; still uuencoded for uuencode blocks, decoded for yEnc
    pub data: Vec<u8>,
}

/// Part-number markers of a file split across several articles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMarker {
    /// 1-based number of this part
    pub number: u32,
    /// Total number of parts, 0 when unknown
    pub total: u32,
}

/// Output of the uuencode and yEnc detectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyContent {
    /// Body text outside the encoded blocks
    pub text: Vec<u8>,
    /// Files found in the body, in order
    pub binaries: Vec<BinaryPart>,
    /// Set when the body carries one part of a split file
    pub partial: Option<PartialMarker>,
}

impl LegacyContent {
    /// Check if the body carries one part of a split file
    pub fn is_partial(&self) -> bool {
        self.partial.is_some()
    }
}

/// Guess a MIME type from a file name's extension
///
/// Unknown extensions map to `application/octet-stream`.
pub fn guess_mime_type(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.trim(),
        None => "",
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "mpg" | "mpeg" => "video/mpeg",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "txt" | "nfo" => "text/plain",
        "htm" | "html" => "text/html",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        "tar" => "application/x-tar",
        "par2" => "application/x-par2",
        _ => "application/octet-stream",
    }
}
