//! RFC 2045 Content-Transfer-Encoding Tests
//!
//! Reference: https://datatracker.ietf.org/doc/html/rfc2045#section-6
//!
//! Decoded/encoded body state, encoding changes and charset handling.

use nntp_mime::{Body, ContentTree, Encoding, MimeError};

#[test]
fn test_plain_text_leaf() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain\n\nHello\n");

    assert!(tree.contents(id).is_empty());
    assert_eq!(tree.leaf_body(id), Some(&Body::Decoded(b"Hello\n".to_vec())));
    assert_eq!(tree.transfer_encoding(id), Encoding::SevenBit);
    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("Hello"));
}

#[test]
fn test_base64_text_decodes_in_declared_charset() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: text/plain; charset=utf-8\nContent-Transfer-Encoding: base64\n\nR3LDvMOfZQo=\n",
    );

    assert!(!tree.is_decoded(id));
    assert_eq!(tree.decoded_content(id), "Grüße\n".as_bytes());
    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("Grüße"));
    // Text access leaves the body decoded
    assert!(tree.is_decoded(id));
}

#[test]
fn test_quoted_printable_soft_line_break() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: text/plain; charset=iso-8859-1\n\
          Content-Transfer-Encoding: quoted-printable\n\nlong=\nline caf=E9\n",
    );

    assert_eq!(tree.decoded_content(id), b"longline caf\xe9");
    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("longline café"));
}

#[test]
fn test_decoded_content_does_not_modify_node() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: image/gif\nContent-Transfer-Encoding: base64\n\nR0lGODk=\n");

    assert_eq!(tree.decoded_content(id), b"GIF89");
    assert_eq!(tree.leaf_body(id), Some(&Body::Encoded(b"R0lGODk=\n".to_vec())));
}

#[test]
fn test_text_change_encoding_defers_to_serialization() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: text/plain; charset=utf-8\n\
          Content-Transfer-Encoding: quoted-printable\n\nGr=C3=BC=C3=9Fe\n",
    );

    tree.change_encoding(id, Encoding::Base64).unwrap();
    assert_eq!(tree.transfer_encoding(id), Encoding::Base64);
    assert_eq!(tree.leaf_body(id), Some(&Body::Decoded("Grüße\n".as_bytes().to_vec())));

    tree.assemble(id);
    assert_eq!(
        tree.encoded_content(id, false),
        b"Content-Type: text/plain; charset=utf-8\n\
          Content-Transfer-Encoding: base64\n\nR3LDvMOfZQo=\n"
    );
}

#[test]
fn test_binary_to_base64() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(
        b"Content-Type: application/octet-stream\nContent-Transfer-Encoding: binary\n\n\x00\x01\x02",
    );

    tree.change_encoding(id, Encoding::Base64).unwrap();
    assert_eq!(tree.leaf_body(id), Some(&Body::Encoded(b"AAEC\n".to_vec())));
    assert_eq!(tree.decoded_content(id), [0, 1, 2]);
}

#[test]
fn test_change_encoding_is_idempotent() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: image/png\nContent-Transfer-Encoding: base64\n\niVBORw0KGgo=\n");
    let before = tree.leaf_body(id).cloned();

    tree.change_encoding(id, Encoding::Base64).unwrap();
    tree.change_encoding(id, Encoding::Base64).unwrap();
    assert_eq!(tree.leaf_body(id).cloned(), before);

    let text = tree.parse_new(b"Content-Type: text/plain\n\nsame\n");
    tree.change_encoding(text, Encoding::QuotedPrintable).unwrap();
    let once = tree.leaf_body(text).cloned();
    tree.change_encoding(text, Encoding::QuotedPrintable).unwrap();
    assert_eq!(tree.leaf_body(text).cloned(), once);
}

#[test]
fn test_non_text_rejects_other_targets() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: image/png\nContent-Transfer-Encoding: base64\n\niVBORw==\n");

    let err = tree.change_encoding(id, Encoding::QuotedPrintable).unwrap_err();
    assert_eq!(err, MimeError::UnsupportedEncoding(Encoding::QuotedPrintable));
    assert_eq!(err.to_string(), "Cannot convert non-text content to quoted-printable");
    assert_eq!(tree.transfer_encoding(id), Encoding::Base64);
}

#[test]
fn test_unknown_encoding_treated_as_7bit_and_preserved() {
    let raw = b"Content-Type: application/octet-stream\nContent-Transfer-Encoding: x-gzip64\n\nH4sI\n";
    let mut tree = ContentTree::new();
    let id = tree.parse_new(raw);

    assert_eq!(tree.transfer_encoding(id), Encoding::SevenBit);
    assert!(tree.is_decoded(id));
    assert_eq!(tree.decoded_content(id), b"H4sI\n");

    tree.assemble(id);
    assert_eq!(tree.encoded_content(id, false), raw);
}

#[test]
fn test_unknown_charset_falls_back_to_default() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain; charset=x-klingon\n\ncaf\xe9\n");

    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("café"));
    assert_eq!(tree.content_type(id).unwrap().charset(), Some("ISO-8859-1"));
}

#[test]
fn test_missing_charset_uses_default_without_rewriting() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/html\n\n\xe9t\xe9\n");

    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("été"));
    assert_eq!(tree.content_type(id).unwrap().charset(), None);
}

#[test]
fn test_decoded_text_trimming() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain\n\nline  \n\n\n");

    assert_eq!(tree.decoded_text(id, false, false).as_deref(), Some("line  \n\n"));
    assert_eq!(tree.decoded_text(id, false, true).as_deref(), Some("line  "));
    assert_eq!(tree.decoded_text(id, true, false).as_deref(), Some("line"));
}

#[test]
fn test_decoded_text_is_none_for_binary() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: image/png\n\nPNG\n");
    assert_eq!(tree.decoded_text(id, false, false), None);
}

#[test]
fn test_from_unicode_string_uses_declared_charset() {
    let mut tree = ContentTree::new();
    let id = tree.create();
    let ct = tree.content_type_mut(id);
    ct.set_mime_type("text/plain");
    ct.set_charset("iso-8859-1");

    tree.from_unicode_string(id, "café\n");
    assert_eq!(tree.leaf_body(id), Some(&Body::Decoded(b"caf\xe9\n".to_vec())));

    tree.change_encoding(id, Encoding::QuotedPrintable).unwrap();
    tree.assemble(id);
    assert_eq!(
        tree.encoded_content(id, false),
        b"Content-Type: text/plain; charset=iso-8859-1\n\
          Content-Transfer-Encoding: quoted-printable\n\ncaf=E9\n"
    );
}

#[test]
fn test_base64_size_matches_wire_length() {
    let mut tree = ContentTree::new();
    let id = tree.create();
    tree.content_type_mut(id).set_mime_type("application/octet-stream");
    tree.content_transfer_encoding_mut(id).set_encoding(Encoding::Base64);
    tree.set_body(id, &[0u8; 100]);

    assert!(tree.is_decoded(id));
    assert_eq!(tree.size(id), 138);
    assert_eq!(tree.encoded_body(id).len(), tree.size(id));

    // Encoded bodies report their stored length
    let encoded = tree.parse_new(b"Content-Type: image/gif\nContent-Transfer-Encoding: base64\n\nR0lGODk=\n");
    assert_eq!(tree.size(encoded), 9);
}

#[test]
fn test_crlf_output() {
    let mut tree = ContentTree::new();
    let id = tree.parse_new(b"Content-Type: text/plain\n\nHello\nWorld\n");

    assert_eq!(
        tree.encoded_content(id, true),
        b"Content-Type: text/plain\r\n\r\nHello\r\nWorld\r\n"
    );
}
