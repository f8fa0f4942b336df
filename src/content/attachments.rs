//! Main text and attachment discovery

use super::{ContentId, ContentTree};
use crate::headers::{ContentDisposition, ContentType, Disposition};

/// Subtypes of `application/*` that carry signatures or encryption
const CRYPTO_SUBTYPES: &[&str] = &[
    "pgp-encrypted",
    "pgp-signature",
    "pkcs7-mime",
    "x-pkcs7-mime",
    "pkcs7-signature",
    "x-pkcs7-signature",
];

impl ContentTree {
    /// First text node of the subtree, `id` itself included, depth first
    pub fn text_content(&self, id: ContentId) -> Option<ContentId> {
        if self.is_text_node(id) {
            return Some(id);
        }
        self.contents(id)
            .iter()
            .find_map(|&child| self.text_content(child))
    }

    /// Parts of the subtree that a mail reader would list as attachments
    ///
    /// Only multipart nodes are searched, except `multipart/related`, whose
    /// parts belong to the main document. Non-attachment parts are searched
    /// recursively.
    pub fn attachments(&self, id: ContentId) -> Vec<ContentId> {
        let searchable = self
            .content_type(id)
            .is_some_and(|ct| ct.is_multipart() && !ct.is_sub_type("related"));
        if !searchable {
            return Vec::new();
        }

        let mut result = Vec::new();
        for &child in self.contents(id) {
            if self.is_attachment(child) {
                result.push(child);
            } else {
                result.extend(self.attachments(child));
            }
        }
        result
    }

    /// Check if a part looks like an attachment
    ///
    /// Multiparts never are and encapsulated messages always are. The main
    /// text of the message and signature or encryption parts are not.
    /// Otherwise a file name or an `attachment` disposition decides.
    pub fn is_attachment(&self, id: ContentId) -> bool {
        let ct = self.content_type(id);
        if ct.is_some_and(ContentType::is_multipart) {
            return false;
        }
        if ct.is_some_and(|ct| ct.is_mime_type("message/rfc822")) {
            return true;
        }
        if self.text_content(self.top_level(id)) == Some(id) {
            return false;
        }
        if self.is_crypto_part(id) {
            return false;
        }

        let cd = self.content_disposition(id);
        cd.and_then(ContentDisposition::filename)
            .is_some_and(|name| !name.is_empty())
            || ct
                .and_then(ContentType::name)
                .is_some_and(|name| !name.is_empty())
            || cd.is_some_and(|cd| cd.disposition() == Disposition::Attachment)
    }

    fn is_crypto_part(&self, id: ContentId) -> bool {
        let Some(ct) = self.content_type(id) else {
            return false;
        };
        if !ct.is_media_type("application") {
            return false;
        }
        let sub_type = ct.sub_type().to_ascii_lowercase();
        if CRYPTO_SUBTYPES.contains(&sub_type.as_str()) {
            return true;
        }
        // Encrypted payload of a PGP/MIME message
        sub_type == "octet-stream"
            && self
                .content_disposition(id)
                .and_then(ContentDisposition::filename)
                .is_some_and(|name| {
                    name.eq_ignore_ascii_case("msg.asc") || name.eq_ignore_ascii_case("encrypted.asc")
                })
    }
}
