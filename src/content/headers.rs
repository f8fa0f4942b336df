//! Header access on content nodes

use super::{ContentId, ContentTree};
use crate::headers::{
    ContentDisposition, ContentTransferEncoding, ContentType, Encoding, Header, TypedHeader,
    Unstructured, names,
};

impl ContentTree {
    /// Parsed headers, in the order they appear
    pub fn headers(&self, id: ContentId) -> &[Header] {
        &self.node(id).headers
    }

    /// First header named `name`
    pub fn header_by_type(&self, id: ContentId, name: &str) -> Option<&Header> {
        self.node(id).headers.iter().find(|h| h.is(name))
    }

    /// All headers named `name`
    pub fn headers_by_type(&self, id: ContentId, name: &str) -> Vec<&Header> {
        self.node(id).headers.iter().filter(|h| h.is(name)).collect()
    }

    /// Check if a header named `name` is present
    pub fn has_header(&self, id: ContentId, name: &str) -> bool {
        self.header_by_type(id, name).is_some()
    }

    /// Append a header, keeping any existing one of the same name
    pub fn append_header(&mut self, id: ContentId, header: Header) {
        self.node_mut(id).headers.push(header);
    }

    /// Replace every header of the same name with `header`
    pub fn set_header(&mut self, id: ContentId, header: Header) {
        let headers = &mut self.node_mut(id).headers;
        headers.retain(|h| !h.is(header.name()));
        headers.push(header);
    }

    /// Remove the first header named `name`
    ///
    /// Returns `true` if a header was removed.
    pub fn remove_header(&mut self, id: ContentId, name: &str) -> bool {
        let headers = &mut self.node_mut(id).headers;
        match headers.iter().position(|h| h.is(name)) {
            Some(pos) => {
                headers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Typed view of the first header of type `T`
    pub fn header<T: TypedHeader>(&self, id: ContentId) -> Option<&T> {
        self.node(id).headers.iter().find_map(T::from_header)
    }

    /// Mutable typed view of the first header of type `T`
    ///
    /// A default header is appended when none exists.
    pub fn header_mut<T: TypedHeader>(&mut self, id: ContentId) -> &mut T {
        let headers = &mut self.node_mut(id).headers;
        let pos = match headers.iter().position(|h| T::from_header(h).is_some()) {
            Some(pos) => pos,
            None => {
                headers.push(T::default().into_header());
                headers.len() - 1
            }
        };
        T::coerce_mut(&mut headers[pos])
    }

    /// Content-Type, if declared
    pub fn content_type(&self, id: ContentId) -> Option<&ContentType> {
        self.header(id)
    }

    /// Content-Type, created empty when missing
    pub fn content_type_mut(&mut self, id: ContentId) -> &mut ContentType {
        self.header_mut(id)
    }

    /// Content-Transfer-Encoding, if declared
    pub fn content_transfer_encoding(&self, id: ContentId) -> Option<&ContentTransferEncoding> {
        self.header(id)
    }

    /// Content-Transfer-Encoding, created as 7bit when missing
    pub fn content_transfer_encoding_mut(&mut self, id: ContentId) -> &mut ContentTransferEncoding {
        self.header_mut(id)
    }

    /// Declared transfer encoding; 7bit when absent or unknown
    pub fn transfer_encoding(&self, id: ContentId) -> Encoding {
        self.content_transfer_encoding(id)
            .map(ContentTransferEncoding::encoding)
            .unwrap_or_default()
    }

    /// Content-Disposition, if declared
    pub fn content_disposition(&self, id: ContentId) -> Option<&ContentDisposition> {
        self.header(id)
    }

    /// Content-Disposition, created empty when missing
    pub fn content_disposition_mut(&mut self, id: ContentId) -> &mut ContentDisposition {
        self.header_mut(id)
    }

    /// Decoded Content-Description text
    pub fn content_description(&self, id: ContentId) -> Option<String> {
        self.unstructured_text(id, names::CONTENT_DESCRIPTION)
    }

    /// Set the Content-Description text
    pub fn set_content_description(&mut self, id: ContentId, text: &str) {
        let header = Unstructured::new(names::CONTENT_DESCRIPTION, text);
        self.set_header(id, Header::ContentDescription(header));
    }

    /// Content-Location value
    pub fn content_location(&self, id: ContentId) -> Option<String> {
        self.unstructured_text(id, names::CONTENT_LOCATION)
    }

    /// Set the Content-Location value
    pub fn set_content_location(&mut self, id: ContentId, location: &str) {
        let header = Unstructured::new(names::CONTENT_LOCATION, location);
        self.set_header(id, Header::ContentLocation(header));
    }

    /// Content-ID value, angle brackets included
    pub fn content_id(&self, id: ContentId) -> Option<String> {
        self.unstructured_text(id, names::CONTENT_ID)
    }

    /// Set the Content-ID value
    pub fn set_content_id(&mut self, id: ContentId, content_id: &str) {
        self.set_header(id, Header::ContentId(Unstructured::new(names::CONTENT_ID, content_id)));
    }

    fn unstructured_text(&self, id: ContentId, name: &str) -> Option<String> {
        self.header_by_type(id, name)
            .and_then(Header::as_unstructured)
            .map(Unstructured::text)
    }

    /// Check if the declared type is text; a missing Content-Type counts
    pub(crate) fn is_text_node(&self, id: ContentId) -> bool {
        self.content_type(id).is_none_or(ContentType::is_text)
    }

    /// Check if the declared type is `message/rfc822`
    pub(crate) fn is_message_type(&self, id: ContentId) -> bool {
        self.content_type(id)
            .is_some_and(|ct| ct.is_mime_type("message/rfc822"))
    }
}
