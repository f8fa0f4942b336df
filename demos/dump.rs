//! Print the MIME structure of an article
//!
//! Run with: cargo run --example dump -- path/to/article.eml
//!
//! Set `RUST_LOG=nntp_mime=debug` to see parser decisions.

use nntp_mime::codec::crlf_to_lf;
use nntp_mime::{ContentId, ContentTree};
use tracing_subscriber::EnvFilter;

fn print_node(tree: &ContentTree, id: ContentId, depth: usize) {
    let index = tree.index(id);
    let label = if index.is_empty() {
        "root".to_string()
    } else {
        index.to_string()
    };
    let mime_type = tree
        .content_type(id)
        .map(|ct| ct.mime_type())
        .unwrap_or_else(|| "text/plain".to_string());

    print!(
        "{:indent$}{label} {mime_type} [{}] {} bytes",
        "",
        tree.transfer_encoding(id),
        tree.size(id),
        indent = depth * 2
    );
    if let Some(name) = tree
        .content_disposition(id)
        .and_then(|cd| cd.filename())
        .or_else(|| tree.content_type(id).and_then(|ct| ct.name()))
    {
        print!(" \"{name}\"");
    }
    if tree.is_attachment(id) {
        print!(" (attachment)");
    }
    println!();

    for &child in tree.contents(id) {
        print_node(tree, child, depth + 1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: dump <article file>")?;
    // .eml files and raw articles use CRLF
    let raw = crlf_to_lf(&std::fs::read(&path)?);

    let mut tree = ContentTree::new();
    let root = tree.parse_new(&raw);

    if let Some(subject) = tree
        .header_by_type(root, "Subject")
        .and_then(|h| h.as_unstructured())
    {
        println!("Subject: {}", subject.text());
    }
    print_node(&tree, root, 0);

    let attachments = tree.attachments(root);
    println!("{} attachment(s)", attachments.len());
    if let Some(text) = tree.text_content(root)
        && let Some(body) = tree.decoded_text(text, true, true)
    {
        println!("--- text ---\n{body}");
    }

    Ok(())
}
