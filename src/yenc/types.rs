/// Line length assumed when `=ybegin` omits `line=`
pub const DEFAULT_LINE_LENGTH: usize = 128;

/// yEnc header from =ybegin line
#[derive(Debug, Clone, PartialEq)]
pub struct YencHeader {
    /// Line length (typically 128, max 997)
    pub line: usize,
    /// Total file size in bytes
    pub size: u64,
    /// Original filename, spaces included
    pub name: String,
    /// Part number (for multi-part files)
    pub part: Option<u32>,
    /// Total number of parts (yEnc 1.2 and later)
    pub total: Option<u32>,
}

/// yEnc part header from =ypart line (for multi-part files)
#[derive(Debug, Clone, PartialEq)]
pub struct YencPart {
    /// 1-based offset of the first byte of this part in the original file
    pub begin: u64,
    /// 1-based offset of the last byte of this part in the original file
    pub end: u64,
}

impl YencPart {
    /// Number of bytes this part carries
    pub fn len(&self) -> u64 {
        (self.end + 1).saturating_sub(self.begin)
    }

    /// Check if the declared range is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// yEnc trailer from =yend line
#[derive(Debug, Clone, PartialEq)]
pub struct YencEnd {
    /// Size of decoded data in bytes
    pub size: u64,
    /// CRC32 of entire decoded file (for single-part) or this part (for multi-part)
    pub crc32: Option<u32>,
    /// CRC32 of this part only (for multi-part files)
    pub pcrc32: Option<u32>,
}

/// One decoded yEnc block
#[derive(Debug, Clone)]
pub struct YencDecoded {
    /// Parsed header information
    pub header: YencHeader,
    /// Part information (for multi-part files)
    pub part: Option<YencPart>,
    /// Trailer information
    pub trailer: YencEnd,
    /// Decoded binary data
    pub data: Vec<u8>,
    /// Calculated CRC32 of decoded data
    pub calculated_crc32: u32,
}

impl YencDecoded {
    /// Verify CRC32 matches expected value
    ///
    /// Returns `None` when the trailer carries no checksum.
    pub fn verify_crc32(&self) -> Option<bool> {
        // For multi-part files, check pcrc32 (part CRC)
        if let Some(expected) = self.trailer.pcrc32 {
            return Some(self.calculated_crc32 == expected);
        }
        // A multi-part crc32 covers the whole file, not this part
        if self.part.is_none()
            && let Some(expected) = self.trailer.crc32
        {
            return Some(self.calculated_crc32 == expected);
        }
        None
    }

    /// Check if this block is one part of a multi-part file
    pub fn is_multipart(&self) -> bool {
        self.header.part.is_some()
    }

    /// Number of bytes the headers promise for this block
    pub fn expected_size(&self) -> u64 {
        match &self.part {
            Some(part) => part.len(),
            None => self.header.size,
        }
    }
}
