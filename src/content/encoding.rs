//! Transfer-encoding engine: decoded/encoded body state and conversions

use tracing::debug;

use super::{Body, ContentId, ContentTree, Payload};
use crate::codec::{base64, charset, quoted_printable, uuencode};
use crate::headers::{ContentType, Encoding};
use crate::{MimeError, Result};

/// Drop one trailing LF, if any
fn chop_newline(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
}

impl ContentTree {
    /// Body bytes with the transfer encoding removed
    ///
    /// Does not modify the node. Quoted-printable and 7bit/8bit bodies lose
    /// one trailing line break; base64, uuencode and binary bodies are
    /// returned exactly as decoded. Multipart and message nodes have no
    /// content of their own and return nothing.
    pub fn decoded_content(&self, id: ContentId) -> Vec<u8> {
        let bytes = match self.leaf_body(id) {
            Some(Body::Decoded(bytes)) => return bytes.clone(),
            Some(Body::Encoded(bytes)) if !bytes.is_empty() => bytes,
            _ => return Vec::new(),
        };

        match self.transfer_encoding(id) {
            Encoding::Base64 => base64::decode(bytes),
            Encoding::UuEncode => uuencode::decode(bytes),
            Encoding::Binary => bytes.clone(),
            Encoding::QuotedPrintable => {
                let mut decoded = quoted_printable::decode(bytes);
                chop_newline(&mut decoded);
                decoded
            }
            Encoding::SevenBit | Encoding::EightBit => {
                let mut decoded = bytes.clone();
                chop_newline(&mut decoded);
                decoded
            }
        }
    }

    /// Decode a text leaf in place
    ///
    /// Returns `false` for non-text nodes, which must go through
    /// [`decoded_content`](Self::decoded_content) instead. The decoded body
    /// always ends with a line break.
    fn decode_text(&mut self, id: ContentId) -> bool {
        if !self.is_text_node(id) {
            return false;
        }
        let encoding = self.transfer_encoding(id);
        let Payload::Leaf(body) = &mut self.node_mut(id).payload else {
            return false;
        };
        let Body::Encoded(bytes) = &mut *body else {
            return true;
        };

        let mut decoded = match encoding {
            Encoding::Base64 => base64::decode(bytes),
            Encoding::QuotedPrintable => quoted_printable::decode(bytes),
            Encoding::UuEncode => uuencode::decode(bytes),
            Encoding::SevenBit | Encoding::EightBit | Encoding::Binary => std::mem::take(bytes),
        };
        if !decoded.ends_with(b"\n") {
            decoded.push(b'\n');
        }
        *body = Body::Decoded(decoded);
        true
    }

    /// Change the declared transfer encoding, converting the body if needed
    ///
    /// Text is decoded and kept decoded; encoding to `target` happens when
    /// the node is serialized. Other content can only go to base64, which is
    /// applied to the stored body right away. Multipart nodes accept the
    /// identity encodings only, as RFC 2046 requires.
    ///
    /// Fails with [`MimeError::EncapsulatedMessage`] on `message/rfc822`
    /// nodes, which are always 7bit, and with
    /// [`MimeError::UnsupportedEncoding`] for an impossible target.
    pub fn change_encoding(&mut self, id: ContentId, target: Encoding) -> Result<()> {
        if self.body_is_message(id) || self.body_as_message(id).is_some() {
            return Err(MimeError::EncapsulatedMessage);
        }
        if self.transfer_encoding(id) == target {
            return Ok(());
        }

        if self.decode_text(id) {
            self.content_transfer_encoding_mut(id).set_encoding(target);
            return Ok(());
        }

        let is_leaf = self.leaf_body(id).is_some();
        if is_leaf && target == Encoding::Base64 {
            let mut encoded = base64::encode(&self.decoded_content(id));
            if !encoded.is_empty() {
                encoded.push(b'\n');
            }
            self.node_mut(id).payload = Payload::Leaf(Body::Encoded(encoded));
        } else if is_leaf
            || !matches!(target, Encoding::SevenBit | Encoding::EightBit | Encoding::Binary)
        {
            return Err(MimeError::UnsupportedEncoding(target));
        }
        self.content_transfer_encoding_mut(id).set_encoding(target);
        Ok(())
    }

    /// Body as Unicode text, decoded from the declared charset
    ///
    /// With `trim` all trailing whitespace is removed; otherwise with
    /// `remove_trailing_newlines` all trailing line breaks are; otherwise a
    /// single trailing line break is. Returns `None` for non-text content.
    ///
    /// An unknown charset is replaced by the tree's default charset, and the
    /// declared charset is corrected to match.
    pub fn decoded_text(
        &mut self,
        id: ContentId,
        trim: bool,
        remove_trailing_newlines: bool,
    ) -> Option<String> {
        if !self.decode_text(id) {
            return None;
        }
        let encoding = self.resolve_charset(id);
        let mut text = charset::decode_with(encoding, self.body(id));

        if trim {
            text.truncate(text.trim_end().len());
        } else if remove_trailing_newlines {
            text.truncate(text.trim_end_matches('\n').len());
        } else if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Replace the body with `text` in the declared charset
    ///
    /// The body is stored decoded. Children, if any, are discarded.
    pub fn from_unicode_string(&mut self, id: ContentId, text: &str) {
        let encoding = self.resolve_charset(id);
        let bytes = charset::encode_with(encoding, text);
        self.replace_payload(id, Payload::Leaf(Body::Decoded(bytes)));
    }

    /// Resolve the declared charset, falling back to the default charset
    fn resolve_charset(&mut self, id: ContentId) -> &'static encoding_rs::Encoding {
        let declared = self
            .content_type(id)
            .and_then(ContentType::charset)
            .map(str::to_string);
        let label = declared.unwrap_or_else(|| self.config.default_charset.clone());
        if let Some(encoding) = charset::lookup(&label) {
            return encoding;
        }

        let default = self.config.default_charset.clone();
        debug!(charset = %label, fallback = %default, "Unknown charset, using default");
        self.content_type_mut(id).set_charset(default.clone());
        charset::lookup(&default).unwrap_or(encoding_rs::WINDOWS_1252)
    }

    /// Approximate size of the body once transfer-encoded
    ///
    /// Exact for base64. Quoted-printable bodies report their decoded size,
    /// since sizing them would mean encoding the whole body.
    pub fn size(&self, id: ContentId) -> usize {
        match self.leaf_body(id) {
            Some(Body::Decoded(bytes)) if self.transfer_encoding(id) == Encoding::Base64 => {
                base64::encoded_len(bytes.len())
            }
            Some(body) => body.bytes().len(),
            None => 0,
        }
    }

    /// Bytes held in memory by the head and the bodies of the subtree
    pub fn storage_size(&self, id: ContentId) -> usize {
        let node = self.node(id);
        let own = node.head.len();
        match &node.payload {
            Payload::Leaf(body) => own + body.bytes().len(),
            _ => own
                + self
                    .contents(id)
                    .iter()
                    .map(|&child| self.storage_size(child))
                    .sum::<usize>(),
        }
    }

    /// Line count of the subtree
    ///
    /// Counts head lines of every node except the root, and all body lines.
    pub fn line_count(&self, id: ContentId) -> usize {
        let count = |bytes: &[u8]| bytes.iter().filter(|&&b| b == b'\n').count();
        let node = self.node(id);
        let mut lines = count(self.body(id));
        if node.parent.is_some() {
            lines += count(&node.head);
        }
        lines
            + self
                .contents(id)
                .iter()
                .map(|&child| self.line_count(child))
                .sum::<usize>()
    }
}
