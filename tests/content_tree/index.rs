//! Content Index Tests
//!
//! Dotted 1-based addresses (`1.2.3`) resolved against a content tree.

use nntp_mime::{ContentId, ContentIndex, ContentTree};

const DEEP: &[u8] = b"Content-Type: multipart/mixed; boundary=a\n\
\n\
--a\n\
\n\
intro\n\
--a\n\
Content-Type: multipart/mixed; boundary=b\n\
\n\
--b\n\
Content-Type: multipart/alternative; boundary=c\n\
\n\
--c\n\
\n\
plain\n\
--c\n\
Content-Type: text/html\n\
\n\
<p>html</p>\n\
--c--\n\
--b\n\
Content-Type: message/rfc822\n\
\n\
Subject: inner\n\
\n\
inner body\n\
--b--\n\
--a--\n";

fn descendants(tree: &ContentTree, id: ContentId, out: &mut Vec<ContentId>) {
    for &child in tree.contents(id) {
        out.push(child);
        descendants(tree, child, out);
    }
}

#[test]
fn test_index_round_trip_for_every_node() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);
    let mut nodes = Vec::new();
    descendants(&tree, root, &mut nodes);
    assert_eq!(nodes.len(), 7);

    for node in nodes {
        let index = tree.index_for_content(root, node).unwrap();
        assert!(index.is_valid());
        assert_eq!(tree.content(root, &index), Some(node));

        let reparsed: ContentIndex = index.to_string().parse().unwrap();
        assert_eq!(reparsed, index);
        assert_eq!(tree.index(node), index);
    }
}

#[test]
fn test_known_addresses() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);

    let at = |path: &str| tree.content(root, &path.parse().unwrap());
    let html = at("2.1.2").unwrap();
    assert!(tree.content_type(html).unwrap().is_sub_type("html"));
    let inner = at("2.2.1").unwrap();
    assert_eq!(tree.body(inner), b"inner body\n");
    assert_eq!(at("3"), None);
    assert_eq!(at("2.1.3"), None);
    assert_eq!(at("1.1"), None);
}

#[test]
fn test_empty_index_is_root() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);

    let index = tree.index_for_content(root, root).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.to_string(), "");
    assert_eq!(tree.content(root, &ContentIndex::new()), Some(root));
    assert_eq!(tree.index(root), ContentIndex::new());
}

#[test]
fn test_index_relative_to_inner_node() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);
    let middle = tree.contents(root)[1];
    let html = tree.content(root, &"2.1.2".parse().unwrap()).unwrap();

    let relative = tree.index_for_content(middle, html).unwrap();
    assert_eq!(relative.to_string(), "1.2");
    assert_eq!(tree.content(middle, &relative), Some(html));
}

#[test]
fn test_node_outside_subtree_has_no_index() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);
    let intro = tree.contents(root)[0];
    let middle = tree.contents(root)[1];
    let other = tree.parse_new(b"Subject: x\n\ny\n");

    assert_eq!(tree.index_for_content(middle, intro), None);
    assert_eq!(tree.index_for_content(root, other), None);
}

#[test]
fn test_index_follows_edits() {
    let mut tree = ContentTree::new();
    let root = tree.parse_new(DEEP);
    let middle = tree.contents(root)[1];
    assert_eq!(tree.index(middle).to_string(), "2");

    let first = tree.create();
    tree.add_content(root, first, true).unwrap();
    assert_eq!(tree.index(first).to_string(), "1");
    assert_eq!(tree.index(middle).to_string(), "3");
}

#[test]
fn test_invalid_index_strings() {
    assert!("0".parse::<ContentIndex>().is_err());
    assert!("1.x".parse::<ContentIndex>().is_err());
    assert!("1..2".parse::<ContentIndex>().is_err());
    assert_eq!(ContentIndex::from_path(vec![1, 0]), None);
    assert_eq!(
        ContentIndex::from_path(vec![2, 1, 2]).map(|i| i.to_string()),
        Some("2.1.2".to_string())
    );
}
