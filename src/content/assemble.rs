//! Assembly and serialization to wire bytes

use super::{Body, ContentId, ContentTree, Payload};
use crate::codec::{base64, lf_to_crlf, quoted_printable, uuencode};
use crate::headers::{ContentDisposition, ContentType, Encoding, fold_header};

/// File name written on a `begin` line when the headers name none
const UUENCODE_FALLBACK_NAME: &str = "data";

/// Append a `--boundary` (or closing `--boundary--`) line
///
/// A line break goes first unless the output is empty or already ends in
/// one.
fn push_boundary_line(out: &mut Vec<u8>, boundary: &[u8], closing: bool) {
    if !out.is_empty() && !out.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary);
    if closing {
        out.extend_from_slice(b"--");
    }
    out.push(b'\n');
}

impl ContentTree {
    /// Regenerate the head of `id` and all its descendants from their headers
    ///
    /// Empty headers are skipped and long lines are folded at the configured
    /// width. A multipart node without a boundary gets a fresh one. Frozen
    /// nodes are left untouched.
    pub fn assemble(&mut self, id: ContentId) {
        if self.is_frozen(id) {
            return;
        }

        let needs_boundary = !self.contents(id).is_empty()
            && self.body_as_message(id).is_none()
            && self
                .content_type(id)
                .and_then(ContentType::boundary)
                .is_none_or(str::is_empty);
        if needs_boundary {
            let boundary = self.new_boundary();
            self.content_type_mut(id).set_boundary(boundary);
        }

        let width = self.config.fold_width;
        let mut head = String::new();
        for header in self.headers(id).iter().filter(|h| !h.is_empty()) {
            head.push_str(&fold_header(&header.as_7bit_string(), width));
            head.push('\n');
        }
        self.node_mut(id).head = head.into_bytes();

        for child in self.contents(id).to_vec() {
            self.assemble(child);
        }
    }

    /// Head and body as wire bytes
    ///
    /// A blank line is inserted between head and body unless one of them
    /// already provides the separation, so content that was read in is
    /// reproduced byte for byte. With `use_crlf` every LF becomes CRLF.
    pub fn encoded_content(&self, id: ContentId, use_crlf: bool) -> Vec<u8> {
        let head = &self.node(id).head;
        let body = self.encoded_body(id);

        let mut out = Vec::with_capacity(head.len() + body.len() + 1);
        out.extend_from_slice(head);
        if !head.ends_with(b"\n\n")
            && !body.starts_with(b"\n\n")
            && !(head.ends_with(b"\n") && body.starts_with(b"\n"))
        {
            out.push(b'\n');
        }
        out.extend_from_slice(&body);

        if use_crlf { lf_to_crlf(&out) } else { out }
    }

    /// Body as wire bytes
    ///
    /// - frozen: the body as first parsed;
    /// - encapsulated message: the message's encoded content;
    /// - leaf: the body, encoded now if it is held decoded;
    /// - multipart: preamble, each part after a boundary line, closing
    ///   boundary line, epilogue.
    pub fn encoded_body(&self, id: ContentId) -> Vec<u8> {
        let node = self.node(id);
        if node.frozen {
            if !node.frozen_body.is_empty() {
                return node.frozen_body.clone();
            }
            if let Payload::Leaf(body) = &node.payload {
                return body.bytes().to_vec();
            }
        }

        match &node.payload {
            Payload::Message(child) => self.encoded_content(*child, false),
            Payload::Leaf(body) => self.encode_leaf(id, body),
            Payload::Multipart {
                parts,
                preamble,
                epilogue,
            } => {
                if parts.is_empty() {
                    return Vec::new();
                }
                let boundary = self
                    .content_type(id)
                    .and_then(ContentType::boundary)
                    .unwrap_or_default()
                    .as_bytes();

                let mut out = preamble.clone();
                for &part in parts {
                    push_boundary_line(&mut out, boundary, false);
                    out.extend_from_slice(&self.encoded_content(part, false));
                }
                push_boundary_line(&mut out, boundary, true);
                out.extend_from_slice(epilogue);
                out
            }
        }
    }

    fn encode_leaf(&self, id: ContentId, body: &Body) -> Vec<u8> {
        let bytes = match body {
            Body::Decoded(bytes) if !bytes.is_empty() => bytes,
            _ => return body.bytes().to_vec(),
        };
        match self.transfer_encoding(id) {
            Encoding::QuotedPrintable => quoted_printable::encode(bytes),
            Encoding::Base64 => {
                let mut out = base64::encode(bytes);
                out.push(b'\n');
                out
            }
            Encoding::UuEncode => {
                let mut out = format!("begin 644 {}\n", self.uuencode_name(id)).into_bytes();
                out.extend_from_slice(&uuencode::encode(bytes));
                out.extend_from_slice(b"end\n");
                out
            }
            Encoding::SevenBit | Encoding::EightBit | Encoding::Binary => bytes.clone(),
        }
    }

    /// Name for the `begin` line: the disposition filename, then the
    /// Content-Type name
    fn uuencode_name(&self, id: ContentId) -> &str {
        self.content_disposition(id)
            .and_then(ContentDisposition::filename)
            .or_else(|| self.content_type(id).and_then(ContentType::name))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UUENCODE_FALLBACK_NAME)
    }
}
