//! Content Assembly Tests
//!
//! Reference: https://datatracker.ietf.org/doc/html/rfc2049#section-2
//!
//! Building messages from scratch, regenerating heads, and the lossless
//! round trip of unmodified input.

use nntp_mime::codec::crlf_to_lf;
use nntp_mime::headers::Header;
use nntp_mime::{ContentTree, Disposition, Encoding};

#[test]
fn test_unmodified_input_round_trips() {
    let samples: [&[u8]; 4] = [
        b"Content-Type: text/plain\n\nHello\n",
        b"\nbody without head\n",
        b"Subject: blank lines\n\n\n\nbody after blanks\n",
        b"Content-Type: multipart/mixed; boundary=b\n\npreamble\n--b\n\n\none\n\n--b\n\ntwo\n--b--\n\nepilogue\n",
    ];

    for raw in samples {
        let mut tree = ContentTree::new();
        let root = tree.parse_new(raw);
        assert_eq!(
            tree.encoded_content(root, false),
            raw,
            "{}",
            String::from_utf8_lossy(raw)
        );
    }
}

#[test]
fn test_build_message_from_scratch() {
    let mut tree = ContentTree::new();
    let root = tree.create();
    tree.set_header(root, Header::parse("Subject", "Report"));
    let ct = tree.content_type_mut(root);
    ct.set_mime_type("text/plain");
    ct.set_charset("utf-8");
    tree.from_unicode_string(root, "Grüße\n");
    tree.change_encoding(root, Encoding::QuotedPrintable).unwrap();

    let pdf = tree.create();
    tree.content_type_mut(pdf).set_mime_type("application/pdf");
    tree.set_body(pdf, b"%PDF-1.4");
    tree.change_encoding(pdf, Encoding::Base64).unwrap();
    let cd = tree.content_disposition_mut(pdf);
    cd.set_disposition(Disposition::Attachment);
    cd.set_filename("r.pdf");

    tree.add_content(root, pdf, false).unwrap();
    tree.assemble(root);
    let wire = tree.encoded_content(root, false);

    let mut copy = ContentTree::new();
    let reparsed = copy.parse_new(&wire);
    assert!(copy.content_type(reparsed).unwrap().is_mime_type("multipart/mixed"));
    assert!(copy.has_header(reparsed, "Subject"));

    let [text, attachment] = *copy.contents(reparsed) else {
        panic!("expected two parts");
    };
    assert_eq!(copy.transfer_encoding(text), Encoding::QuotedPrintable);
    assert_eq!(copy.decoded_text(text, false, false).as_deref(), Some("Grüße"));
    assert_eq!(copy.decoded_content(attachment), b"%PDF-1.4");
    assert_eq!(copy.text_content(reparsed), Some(text));
    assert_eq!(copy.attachments(reparsed), vec![attachment]);
}

#[test]
fn test_assembled_head_keeps_header_order() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(
        b"From: a@example.com\nContent-Type: text/plain\nX-Mailer: test\nSubject: hi\n\nbody\n",
    );
    tree.assemble(root);

    assert_eq!(
        tree.head(root),
        b"From: a@example.com\nContent-Type: text/plain\nX-Mailer: test\nSubject: hi\n".as_slice()
    );
}

#[test]
fn test_assembled_output_reparses_to_same_content() {
    let raw = b"Content-Type: multipart/alternative;\n\tboundary=\"alt\"\n\n\
--alt\n\
Content-Type: text/plain;charset=\"iso-8859-1\"\n\
Content-Transfer-Encoding: quoted-printable\n\
\n\
caf=E9\n\
--alt\n\
Content-Type: text/html\n\
\n\
<p>caf&eacute;</p>\n\
--alt--\n";
    let mut tree = ContentTree::new();
    let root = tree.parse_new(raw);
    tree.assemble(root);
    let wire = tree.encoded_content(root, false);

    let mut copy = ContentTree::new();
    let reparsed = copy.parse_new(&wire);
    let [plain, html] = *copy.contents(reparsed) else {
        panic!("expected two parts");
    };
    assert_eq!(copy.decoded_text(plain, false, false).as_deref(), Some("café"));
    assert_eq!(copy.body(html), b"<p>caf&eacute;</p>\n");
    assert_eq!(
        copy.content_type(reparsed).and_then(|ct| ct.boundary()),
        Some("alt")
    );
}

#[test]
fn test_multipart_crlf_output() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(b"Content-Type: multipart/mixed; boundary=b\n\n--b\n\none\n--b--\n");

    assert_eq!(
        tree.encoded_content(root, true),
        b"Content-Type: multipart/mixed; boundary=b\r\n\r\n--b\r\n\r\none\r\n--b--\r\n"
    );
}

#[test]
fn test_crlf_article_normalized_before_parsing() {
    let wire = b"Subject: hi\r\n\
Content-Type: multipart/mixed; boundary=X\r\n\
\r\n\
--X\r\n\
Content-Type: text/plain\r\n\
\r\n\
A\r\n\
--X--\r\n";
    let mut tree = ContentTree::new();
    let root = tree.parse_new(&crlf_to_lf(wire));

    let [text] = *tree.contents(root) else {
        panic!("expected one part");
    };
    assert_eq!(tree.body(text), b"A\n");
    assert_eq!(tree.encoded_content(root, true), wire);

    tree.assemble(root);
    assert_eq!(tree.encoded_content(root, true), wire);
}

#[test]
fn test_set_content_and_reparse() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(b"Content-Type: text/plain\n\nold\n");

    tree.set_content(root, b"Content-Type: text/html\n\n<p>new</p>\n");
    tree.parse(root);
    assert!(tree.content_type(root).unwrap().is_sub_type("html"));
    assert_eq!(tree.body(root), b"<p>new</p>\n");
}

#[test]
fn test_size_accounting() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(
        b"Content-Type: multipart/mixed; boundary=b\n\n--b\nContent-Type: text/plain\n\none\ntwo\n--b--\n",
    );
    let part = tree.contents(root)[0];

    assert_eq!(tree.line_count(root), 3);
    assert_eq!(tree.line_count(part), 3);
    assert_eq!(
        tree.storage_size(root),
        tree.head(root).len() + tree.head(part).len() + tree.body(part).len()
    );
    assert_eq!(tree.size(part), 8);
    assert_eq!(tree.size(root), 0);
}
