//! yEnc Normalization Tests
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt
//!
//! yEnc blocks in a plain-text body become base64 attachments; a single
//! part of a split file becomes `message/partial`.

use nntp_mime::{ContentTree, Disposition, Encoding};

fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for &byte in data {
        let shifted = byte.wrapping_add(42);
        if matches!(shifted, 0 | b'\t' | b'\n' | b'\r' | b' ' | b'=' | b'.') {
            out.push(b'=');
            out.push(shifted.wrapping_add(64));
        } else {
            out.push(shifted);
        }
    }
    out.push(b'\n');
    out
}

fn single_block(name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = format!("=ybegin line=128 size={} name={name}\n", data.len()).into_bytes();
    out.extend_from_slice(&encode(data));
    out.extend_from_slice(
        format!("=yend size={} crc32={:08x}\n", data.len(), crc32fast::hash(data)).as_bytes(),
    );
    out
}

fn article(body: &[u8]) -> Vec<u8> {
    let mut raw = b"Subject: yEnc test\n\n".to_vec();
    raw.extend_from_slice(body);
    raw
}

#[test]
fn test_single_block_becomes_attachment() {
    let data: Vec<u8> = (0..=255u8).collect();
    let mut body = b"Posting a file\n".to_vec();
    body.extend_from_slice(&single_block("photo.jpg", &data));
    body.extend_from_slice(b"-- \nsig\n");

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article(&body));

    assert!(tree.content_type(root).unwrap().is_mime_type("multipart/mixed"));
    let [text, file] = *tree.contents(root) else {
        panic!("expected text and one file");
    };
    assert_eq!(tree.body(text), b"Posting a file\n-- \nsig\n");

    let ct = tree.content_type(file).unwrap();
    assert!(ct.is_mime_type("image/jpeg"));
    assert_eq!(ct.name(), Some("photo.jpg"));
    assert_eq!(
        tree.content_disposition(file).map(|cd| cd.disposition()),
        Some(Disposition::Attachment)
    );
    assert_eq!(tree.transfer_encoding(file), Encoding::Base64);
    assert!(!tree.is_decoded(file));
    assert_eq!(tree.decoded_content(file), data);
    assert_eq!(tree.attachments(root), vec![file]);
}

#[test]
fn test_several_blocks() {
    let mut body = single_block("a.png", b"first");
    body.extend_from_slice(&single_block("b.png", b"second"));

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article(&body));

    let [text, a, b] = *tree.contents(root) else {
        panic!("expected text and two files");
    };
    assert!(tree.body(text).is_empty());
    assert_eq!(tree.decoded_content(a), b"first");
    assert_eq!(tree.decoded_content(b), b"second");
}

#[test]
fn test_fragment_becomes_message_partial() {
    let data = b"0123456789";
    let mut body =
        b"=ybegin part=2 total=3 line=128 size=30 name=f.bin\n=ypart begin=11 end=20\n".to_vec();
    body.extend_from_slice(&encode(data));
    body.extend_from_slice(
        format!("=yend size=10 part=2 pcrc32={:08x}\n", crc32fast::hash(data)).as_bytes(),
    );

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article(&body));

    let ct = tree.content_type(root).unwrap();
    assert!(ct.is_mime_type("message/partial"));
    assert_eq!(ct.partial_number(), Some(2));
    assert_eq!(ct.partial_count(), Some(3));
    assert!(tree.contents(root).is_empty());

    // The fragment is stored decoded and re-encoded as base64
    assert_eq!(tree.transfer_encoding(root), Encoding::Base64);
    assert!(!tree.is_decoded(root));
    assert_eq!(tree.decoded_content(root), data);
}

#[test]
fn test_single_part_of_one_is_complete() {
    let data = b"whole";
    let mut body =
        b"=ybegin part=1 total=1 line=128 size=5 name=whole.txt\n=ypart begin=1 end=5\n".to_vec();
    body.extend_from_slice(&encode(data));
    body.extend_from_slice(b"=yend size=5 part=1\n");

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article(&body));

    assert!(tree.content_type(root).unwrap().is_multipart());
    let file = tree.contents(root)[1];
    assert_eq!(tree.decoded_text(file, false, false).as_deref(), Some("whole"));
}

#[test]
fn test_crc_mismatch_keeps_data() {
    let mut body = b"=ybegin line=128 size=3 name=abc.bin\n".to_vec();
    body.extend_from_slice(&encode(b"abc"));
    body.extend_from_slice(b"=yend size=3 crc32=00000000\n");

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&article(&body));

    let file = tree.contents(root)[1];
    assert_eq!(tree.decoded_content(file), b"abc");
}

#[test]
fn test_size_mismatch_stays_text() {
    let mut body = b"=ybegin line=128 size=5 name=short.bin\n".to_vec();
    body.extend_from_slice(&encode(b"abc"));
    body.extend_from_slice(b"=yend size=5\n");
    let raw = article(&body);

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&raw);

    assert!(tree.content_type(root).unwrap().is_plain_text());
    assert!(tree.contents(root).is_empty());
    assert_eq!(tree.encoded_content(root, false), raw);
}
