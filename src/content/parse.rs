//! Parse pipeline: turn a node's head and body into structure

use tracing::{debug, trace};

use super::{Body, ContentId, ContentTree, Payload};
use crate::headers::{ContentCategory, Disposition, Encoding, Header, names, parse_headers};
use crate::parsers::{LegacyContent, multipart, uuencode, yenc};
use crate::{MimeError, Result};

impl ContentTree {
    /// Interpret the node's head and body
    ///
    /// Headers are re-read from the raw head, existing children are replaced,
    /// and the body is decomposed according to the declared Content-Type:
    ///
    /// - text (or no type): uuencoded or yEnc files pasted into the text are
    ///   turned into a `multipart/mixed` with one attachment per file;
    /// - `multipart/*`: split at the boundary into child parts, recursively;
    ///   a body that does not split is downgraded to `text/plain`;
    /// - `message/rfc822`: the body becomes a single child message.
    ///
    /// Parsing never fails. Malformed structure degrades to plain text.
    pub fn parse(&mut self, id: ContentId) {
        self.parse_at(id, 0);
    }

    fn parse_at(&mut self, id: ContentId, depth: usize) {
        // Read the body through the serializer so a reparse sees the same
        // bytes a first parse did, children included
        let raw = self.encoded_body(id);

        let headers = parse_headers(&self.node(id).head);
        let node = self.node_mut(id);
        node.headers = headers;
        if node.frozen {
            node.frozen_body = raw.clone();
        }

        let body = if self.transfer_encoding(id).is_identity() {
            Body::Decoded(raw)
        } else {
            Body::Encoded(raw)
        };
        self.replace_payload(id, Payload::Leaf(body));

        let ct = self.content_type_mut(id);
        if ct.is_empty() {
            ct.set_mime_type("text/plain");
            ct.set_charset("us-ascii");
        }
        let (is_text, is_multipart, mime_type) = (ct.is_text(), ct.is_multipart(), ct.mime_type());
        trace!(mime_type = %mime_type, depth, "Parsing content");

        if is_text {
            self.parse_legacy(id);
        } else if is_multipart {
            if depth >= self.config.max_depth {
                debug!(depth, "Nesting too deep, keeping multipart body opaque");
                return;
            }
            if let Err(e) = self.parse_multipart(id, depth) {
                debug!(error = %e, "Multipart body did not split, treating it as text");
                let ct = self.content_type_mut(id);
                ct.set_mime_type("text/plain");
                ct.set_charset("US-ASCII");
            }
        } else if self.body_is_message(id) {
            if depth >= self.config.max_depth {
                debug!(depth, "Nesting too deep, keeping encapsulated message opaque");
                return;
            }
            self.parse_message(id, depth);
        }
    }

    fn parse_multipart(&mut self, id: ContentId, depth: usize) -> Result<()> {
        let (boundary, category) = {
            let Some(ct) = self.content_type(id) else {
                return Err(MimeError::Malformed("Missing Content-Type".to_string()));
            };
            let category = if ct.is_sub_type("alternative") {
                ContentCategory::AlternativePart
            } else {
                ContentCategory::MixedPart
            };
            (ct.boundary().unwrap_or_default().to_string(), category)
        };

        let split = multipart::split(self.body(id), &boundary)?;
        let frozen = self.is_frozen(id);

        let mut parts = Vec::with_capacity(split.parts.len());
        for raw in &split.parts {
            let child = self.alloc_child(id);
            self.set_content(child, raw);
            self.node_mut(child).frozen = frozen;
            self.parse_at(child, depth + 1);
            self.content_type_mut(child).set_category(category);
            parts.push(child);
        }

        self.node_mut(id).payload = Payload::Multipart {
            parts,
            preamble: split.preamble,
            epilogue: split.epilogue,
        };
        Ok(())
    }

    fn parse_message(&mut self, id: ContentId, depth: usize) {
        let raw = self.body(id).to_vec();
        let frozen = self.is_frozen(id);

        let child = self.alloc_child(id);
        self.set_content(child, &raw);
        self.node_mut(child).frozen = frozen;
        self.parse_at(child, depth + 1);
        self.node_mut(id).payload = Payload::Message(child);
    }

    /// Try the uuencode detector, then the yEnc detector
    fn parse_legacy(&mut self, id: ContentId) {
        let subject = self
            .header_by_type(id, names::SUBJECT)
            .and_then(Header::as_unstructured)
            .map(|h| h.text());

        if let Ok(found) = uuencode::detect(self.body(id), subject.as_deref()) {
            debug!(
                files = found.binaries.len(),
                partial = found.is_partial(),
                "Found uuencoded content"
            );
            self.apply_uuencode(id, found);
        } else if let Ok(found) = yenc::detect(self.body(id)) {
            debug!(
                files = found.binaries.len(),
                partial = found.is_partial(),
                "Found yEnc content"
            );
            self.apply_yenc(id, found);
        }
    }

    fn apply_uuencode(&mut self, id: ContentId, found: LegacyContent) {
        self.content_type_mut(id).clear();

        if let Some(marker) = found.partial {
            let ct = self.content_type_mut(id);
            ct.set_mime_type("message/partial");
            ct.set_partial_params(marker.total, marker.number);
            self.content_transfer_encoding_mut(id)
                .set_encoding(Encoding::SevenBit);
            self.set_decoded(id, true);
            return;
        }

        let text = found.text;
        let binaries = found
            .binaries
            .into_iter()
            .map(|bin| (bin.filename, bin.mime_type, Encoding::UuEncode, Body::Encoded(bin.data)))
            .collect();
        self.build_legacy_multipart(id, text, binaries);
    }

    fn apply_yenc(&mut self, id: ContentId, found: LegacyContent) {
        self.content_type_mut(id).clear();

        if let Some(marker) = found.partial {
            let ct = self.content_type_mut(id);
            ct.set_mime_type("message/partial");
            ct.set_partial_params(marker.total, marker.number);
            let data = found
                .binaries
                .into_iter()
                .next()
                .map(|bin| bin.data)
                .unwrap_or_default();
            self.node_mut(id).payload = Payload::Leaf(Body::Decoded(data));
            self.content_transfer_encoding_mut(id)
                .set_encoding(Encoding::Binary);
            self.reencode_base64(id);
            return;
        }

        let text = found.text;
        let binaries = found
            .binaries
            .into_iter()
            .map(|bin| (bin.filename, bin.mime_type, Encoding::Binary, Body::Decoded(bin.data)))
            .collect();
        self.build_legacy_multipart(id, text, binaries);
    }

    /// Rebuild `id` as `multipart/mixed`: the text first, then one
    /// attachment per file, each converted to base64
    fn build_legacy_multipart(
        &mut self,
        id: ContentId,
        text: Vec<u8>,
        binaries: Vec<(String, String, Encoding, Body)>,
    ) {
        let boundary = self.new_boundary();
        let ct = self.content_type_mut(id);
        ct.set_mime_type("multipart/mixed");
        ct.set_boundary(boundary);
        ct.set_category(ContentCategory::Container);
        self.content_transfer_encoding_mut(id)
            .set_encoding(Encoding::SevenBit);

        let mut parts = Vec::with_capacity(binaries.len() + 1);

        let text_part = self.alloc_child(id);
        let ct = self.content_type_mut(text_part);
        ct.set_mime_type("text/plain");
        ct.set_category(ContentCategory::MixedPart);
        self.content_transfer_encoding_mut(text_part)
            .set_encoding(Encoding::SevenBit);
        self.node_mut(text_part).payload = Payload::Leaf(Body::Decoded(text));
        parts.push(text_part);

        for (filename, mime_type, encoding, body) in binaries {
            let child = self.alloc_child(id);
            let ct = self.content_type_mut(child);
            ct.set_mime_type(&mime_type);
            ct.set_name(filename.clone());
            ct.set_category(ContentCategory::MixedPart);
            self.content_transfer_encoding_mut(child).set_encoding(encoding);
            let cd = self.content_disposition_mut(child);
            cd.set_disposition(Disposition::Attachment);
            cd.set_filename(filename);
            self.node_mut(child).payload = Payload::Leaf(body);
            self.reencode_base64(child);
            parts.push(child);
        }

        self.node_mut(id).payload = Payload::Multipart {
            parts,
            preamble: Vec::new(),
            epilogue: Vec::new(),
        };
    }

    fn reencode_base64(&mut self, id: ContentId) {
        if let Err(e) = self.change_encoding(id, Encoding::Base64) {
            debug!(error = %e, "Could not convert legacy content to base64");
        }
    }
}
