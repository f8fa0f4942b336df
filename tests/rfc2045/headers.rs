//! RFC 2045 Header Field Tests
//!
//! Reference: https://datatracker.ietf.org/doc/html/rfc2045#section-5
//!
//! Content-Type, Content-Transfer-Encoding, Content-Disposition and the
//! unstructured Content-* fields as seen through the content tree.

use nntp_mime::headers::{Header, names};
use nntp_mime::{ContentCategory, ContentTree, Disposition, Encoding, MimeConfig};

#[test]
fn test_content_type_with_parameters() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: Text/HTML; charset=\"ISO-8859-1\"; format=flowed\n\n<p>\n");

    let ct = tree.content_type(id).unwrap();
    assert_eq!(ct.mime_type(), "text/html");
    assert!(ct.is_media_type("TEXT"));
    assert!(ct.is_sub_type("html"));
    assert!(ct.is_text());
    assert_eq!(ct.charset(), Some("ISO-8859-1"));
    assert_eq!(ct.params().get("FORMAT"), Some("flowed"));
    assert_eq!(ct.category(), ContentCategory::Single);
}

#[test]
fn test_folded_header_is_unfolded() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain;\n\tcharset=utf-8\nX-Note: first\n second\n\nbody\n");

    assert_eq!(tree.content_type(id).unwrap().charset(), Some("utf-8"));
    let note = tree.header_by_type(id, "x-note").unwrap();
    assert_eq!(note.as_unstructured().unwrap().value(), "first second");
}

#[test]
fn test_missing_content_type_defaults_to_us_ascii_text() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Subject: no type\n\nbody\n");

    let ct = tree.content_type(id).unwrap();
    assert!(ct.is_plain_text());
    assert_eq!(ct.charset(), Some("us-ascii"));
}

#[test]
fn test_rfc2231_filename() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: application/octet-stream\n\
          Content-Disposition: attachment;\n filename*0*=utf-8''na%C3%AF;\n filename*1=ve.txt\n\nxx\n",
    );

    let cd = tree.content_disposition(id).unwrap();
    assert_eq!(cd.disposition(), Disposition::Attachment);
    assert_eq!(cd.filename(), Some("naïve.txt"));
}

#[test]
fn test_non_ascii_parameter_serialized_as_rfc2231() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: application/pdf\n\n%PDF\n");
    let cd = tree.content_disposition_mut(id);
    cd.set_disposition(Disposition::Attachment);
    cd.set_filename("naïve.pdf");
    tree.assemble(id);

    let head = String::from_utf8(tree.head(id).to_vec()).unwrap();
    assert!(head.contains("filename*=utf-8''na%C3%AFve.pdf"), "{head}");
    assert!(head.is_ascii());
}

#[test]
fn test_unstructured_fields() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: image/png\n\
          Content-ID: <logo@example.com>\n\
          Content-Location: logo.png\n\
          Content-Description: =?utf-8?B?R3LDvMOfZQ==?=\n\nPNG\n",
    );

    assert_eq!(tree.content_id(id).as_deref(), Some("<logo@example.com>"));
    assert_eq!(tree.content_location(id).as_deref(), Some("logo.png"));
    assert_eq!(tree.content_description(id).as_deref(), Some("Grüße"));
}

#[test]
fn test_non_ascii_description_encoded_on_assembly() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain\n\nhi\n");
    tree.set_content_description(id, "Grüße");
    tree.assemble(id);

    assert_eq!(
        tree.head(id),
        b"Content-Type: text/plain\nContent-Description: =?utf-8?B?R3LDvMOfZQ==?=\n".as_slice()
    );
    assert_eq!(tree.content_description(id).as_deref(), Some("Grüße"));
}

#[test]
fn test_mime_header_classification() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Subject: s\nContent-Type: text/plain\nContent-X-Custom: 1\nMIME-Version: 1.0\n\nb\n",
    );

    let mime: Vec<&str> = tree
        .headers(id)
        .iter()
        .filter(|h| h.is_mime_header())
        .map(Header::name)
        .collect();
    assert_eq!(mime, vec![names::CONTENT_TYPE, "Content-X-Custom"]);
}

#[test]
fn test_lookup_is_case_insensitive() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"content-transfer-encoding: BASE64\n\naGk=\n");

    assert!(tree.has_header(id, names::CONTENT_TRANSFER_ENCODING));
    assert!(tree.has_header(id, "CONTENT-TRANSFER-ENCODING"));
    assert_eq!(tree.transfer_encoding(id), Encoding::Base64);
}

#[test]
fn test_long_header_folded_at_configured_width() {
    let mut tree = ContentTree::with_config(MimeConfig::default().with_fold_width(40));
    let id = tree.parse_new(
        b"Subject: a rather long subject line that needs folding before it goes out\n\nb\n",
    );
    tree.assemble(id);

    let head = String::from_utf8(tree.head(id).to_vec()).unwrap();
    let lines: Vec<&str> = head.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.len() <= 40), "{head}");
    assert!(lines[1..].iter().all(|line| line.starts_with(' ')));

    // Re-parsing the folded head gives back the same value
    let subject = tree.header_by_type(id, "Subject").unwrap().as_7bit_string();
    let mut reparsed = ContentTree::new();
    let copy = reparsed.parse_new(&tree.encoded_content(id, false));
    assert_eq!(
        reparsed.header_by_type(copy, "Subject").unwrap().as_7bit_string(),
        subject
    );
}

#[test]
fn test_empty_headers_skipped_on_assembly() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"X-Empty:\nContent-Disposition:\nContent-Type: text/plain\n\nb\n");
    tree.assemble(id);

    assert_eq!(tree.head(id), b"Content-Type: text/plain\n".as_slice());
}
