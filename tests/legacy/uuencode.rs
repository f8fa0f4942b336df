//! uuencode Normalization Tests
//!
//! Reference: https://pubs.opengroup.org/onlinepubs/9699919799/utilities/uuencode.html
//!
//! Files uuencoded into a plain-text body become base64 attachments of a
//! `multipart/mixed` node.

use nntp_mime::codec::uuencode;
use nntp_mime::{ContentTree, Disposition, Encoding};

fn block(name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = format!("begin 644 {name}\n").into_bytes();
    out.extend_from_slice(&uuencode::encode(data));
    out.extend_from_slice(b"end\n");
    out
}

fn article(subject: &str, body: &[u8]) -> Vec<u8> {
    let mut raw = format!("Subject: {subject}\n\n").into_bytes();
    raw.extend_from_slice(body);
    raw
}

#[test]
fn test_uuencoded_file_becomes_attachment() {
    let data: Vec<u8> = (0..100u8).collect();
    let mut body = b"Here is the file:\n".to_vec();
    body.extend_from_slice(&block("data.zip", &data));
    body.extend_from_slice(b"Enjoy\n");

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("archive", &body));

    let ct = tree.content_type(root).unwrap();
    assert!(ct.is_mime_type("multipart/mixed"));
    assert!(ct.boundary().is_some());

    let [text, file] = *tree.contents(root) else {
        panic!("expected text and one file");
    };
    assert!(tree.content_type(text).unwrap().is_plain_text());
    assert_eq!(tree.body(text), b"Here is the file:\nEnjoy\n");
    assert!(!tree.is_attachment(text));

    let ct = tree.content_type(file).unwrap();
    assert!(ct.is_mime_type("application/zip"));
    assert_eq!(ct.name(), Some("data.zip"));
    let cd = tree.content_disposition(file).unwrap();
    assert_eq!(cd.disposition(), Disposition::Attachment);
    assert_eq!(cd.filename(), Some("data.zip"));

    assert_eq!(tree.transfer_encoding(file), Encoding::Base64);
    assert!(!tree.is_decoded(file));
    assert_eq!(tree.decoded_content(file), data);
    assert_eq!(tree.attachments(root), vec![file]);
}

#[test]
fn test_normalized_article_reparses_as_mime() {
    let data = b"\x00\x01binary\xff\xfe".to_vec();
    let mut body = b"See attached.\n".to_vec();
    body.extend_from_slice(&block("blob.bin", &data));

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("blob", &body));
    tree.assemble(root);
    let wire = tree.encoded_content(root, false);

    let mut copy = ContentTree::new();
    let reparsed = copy.parse_new(&wire);
    let [text, file] = *copy.contents(reparsed) else {
        panic!("expected text and one file");
    };
    assert_eq!(copy.body(text), b"See attached.\n");
    assert_eq!(copy.transfer_encoding(file), Encoding::Base64);
    assert_eq!(copy.decoded_content(file), data);
    assert_eq!(
        copy.content_disposition(file).and_then(|cd| cd.filename()),
        Some("blob.bin")
    );
}

#[test]
fn test_multiple_files() {
    let mut body = block("one.png", &[1, 2, 3]);
    body.extend_from_slice(b"and another\n");
    body.extend_from_slice(&block("two.gif", &[4, 5]));

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("pictures", &body));

    let [text, one, two] = *tree.contents(root) else {
        panic!("expected text and two files");
    };
    assert_eq!(tree.body(text), b"and another\n");
    assert!(tree.content_type(one).unwrap().is_mime_type("image/png"));
    assert!(tree.content_type(two).unwrap().is_mime_type("image/gif"));
    assert_eq!(tree.decoded_content(one), [1, 2, 3]);
    assert_eq!(tree.decoded_content(two), [4, 5]);
    assert_eq!(tree.attachments(root), vec![one, two]);
}

#[test]
fn test_text_file_is_decoded_as_text() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("notes", &block("notes.txt", b"Read me\n")));

    let file = tree.contents(root)[1];
    assert!(tree.content_type(file).unwrap().is_plain_text());
    assert_eq!(tree.transfer_encoding(file), Encoding::Base64);
    assert_eq!(tree.decoded_text(file, false, false).as_deref(), Some("Read me"));
}

#[test]
fn test_fragment_of_split_file_becomes_message_partial() {
    let data = vec![0x55u8; 45 * 20];
    let mut lines = uuencode::encode(&data);
    // A middle part: no begin line, no terminator, no end line
    lines.truncate(lines.len() - 2);

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("big.rar (2/3)", &lines));

    let ct = tree.content_type(root).unwrap();
    assert!(ct.is_partial());
    assert_eq!(ct.partial_number(), Some(2));
    assert_eq!(ct.partial_count(), Some(3));
    assert_eq!(tree.transfer_encoding(root), Encoding::SevenBit);
    assert!(tree.contents(root).is_empty());
    assert!(tree.is_decoded(root));
    assert_eq!(tree.body(root), lines.as_slice());
}

#[test]
fn test_fragment_without_part_counter_stays_text() {
    let data = vec![0x55u8; 45 * 20];
    let mut lines = uuencode::encode(&data);
    lines.truncate(lines.len() - 2);

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article("no counter here", &lines));

    assert!(tree.content_type(root).unwrap().is_plain_text());
    assert!(tree.contents(root).is_empty());
}

#[test]
fn test_plain_text_mentioning_begin_is_untouched() {
    let raw = article("plans", b"We begin at noon.\nbegin 644\nend of story\n");
    let mut tree = ContentTree::new();
    let root = tree.parse_new(&raw);

    assert!(tree.contents(root).is_empty());
    assert_eq!(tree.encoded_content(root, false), raw);
}

#[test]
fn test_non_text_content_is_not_scanned() {
    let mut raw = b"Content-Type: application/octet-stream\n\n".to_vec();
    raw.extend_from_slice(&block("inner.bin", b"data"));

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&raw);

    assert!(tree.contents(root).is_empty());
    assert!(tree.content_type(root).unwrap().is_mime_type("application/octet-stream"));
}
