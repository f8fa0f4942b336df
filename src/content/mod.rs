//! The MIME content tree
//!
//! A [`ContentTree`] is an arena holding any number of content nodes, each
//! addressed by a [`ContentId`] handle. A node is one MIME part (or a whole
//! message): a raw header block, parsed [`Header`] objects, and a payload
//! that is exactly one of
//!
//! - a leaf body ([`Body`], tagged decoded or still transfer-encoded),
//! - a multipart sequence of child nodes plus preamble and epilogue,
//! - a single child node holding an encapsulated `message/rfc822`.
//!
//! Every node has at most one parent; nodes without a parent are roots.
//! Handles are generational: once a node is destroyed its handle never
//! resolves again, even if the slot is reused.
//!
//! # Example
//!
//! ```
//! use nntp_mime::ContentTree;
//!
//! let mut tree = ContentTree::new();
//! let root = tree.parse_new(
//!     b"Content-Type: multipart/mixed; boundary=X\n\n--X\nContent-Type: text/plain\n\nA\n--X--\n",
//! );
//!
//! let [child] = tree.contents(root) else { panic!("one part expected") };
//! assert_eq!(tree.body(*child), b"A\n");
//!
//! // Unmodified content serializes to the bytes it was read from
//! assert_eq!(
//!     tree.encoded_content(root, false),
//!     b"Content-Type: multipart/mixed; boundary=X\n\n--X\nContent-Type: text/plain\n\nA\n--X--\n",
//! );
//! ```

mod assemble;
mod attachments;
mod encoding;
mod headers;
mod index;
mod parse;
mod tree;

pub use index::ContentIndex;

use tracing::trace;

use crate::config::MimeConfig;
use crate::headers::{Header, split_head_body};
use crate::{MimeError, Result};

/// Handle to a node of a [`ContentTree`]
///
/// Cheap to copy. Using a handle after its node was destroyed panics; see
/// [`ContentTree::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId {
    index: u32,
    generation: u32,
}

/// Bytes of a leaf body together with their transfer-encoding state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Semantic bytes: text, or binary not yet wire-encoded
    Decoded(Vec<u8>),
    /// Bytes still in the declared transfer encoding
    Encoded(Vec<u8>),
}

impl Body {
    /// Raw stored bytes
    pub fn bytes(&self) -> &[u8] {
        match self {
            Body::Decoded(bytes) | Body::Encoded(bytes) => bytes,
        }
    }

    /// Check if the bytes are decoded
    pub fn is_decoded(&self) -> bool {
        matches!(self, Body::Decoded(_))
    }

    /// Check if there are no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Decoded(bytes) | Body::Encoded(bytes) => bytes,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Decoded(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Leaf(Body),
    Multipart {
        parts: Vec<ContentId>,
        preamble: Vec<u8>,
        epilogue: Vec<u8>,
    },
    Message(ContentId),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Leaf(Body::default())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Node {
    head: Vec<u8>,
    headers: Vec<Header>,
    payload: Payload,
    frozen: bool,
    /// Body as first seen by `parse()` while frozen
    frozen_body: Vec<u8>,
    parent: Option<ContentId>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of MIME content nodes
///
/// Trees are independent of each other; a tree is `Send` and can be
/// processed on any thread, but mutation needs `&mut` access to the whole
/// arena.
#[derive(Debug, Default)]
pub struct ContentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    config: MimeConfig,
}

impl ContentTree {
    /// Create an empty arena with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with the given configuration
    pub fn with_config(config: MimeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration shared by all nodes
    pub fn config(&self) -> &MimeConfig {
        &self.config
    }

    /// Charset used when a declared charset cannot be resolved
    pub fn default_charset(&self) -> &str {
        &self.config.default_charset
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Check if the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if `id` refers to a live node
    pub fn contains(&self, id: ContentId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.node.is_some())
    }

    /// Create an empty root node
    pub fn create(&mut self) -> ContentId {
        self.alloc(Node::default())
    }

    /// Create a root node from raw bytes without parsing them
    pub fn create_from(&mut self, raw: &[u8]) -> ContentId {
        let id = self.create();
        self.set_content(id, raw);
        id
    }

    /// Create a root node from raw bytes and parse it
    ///
    /// Like [`set_content`](Self::set_content), this expects LF line endings.
    pub fn parse_new(&mut self, raw: &[u8]) -> ContentId {
        let id = self.create_from(raw);
        self.parse(id);
        id
    }

    /// Destroy a node and its whole subtree
    ///
    /// The node is first removed from its parent, which may collapse a
    /// multipart parent left with a single child.
    pub fn delete(&mut self, id: ContentId) {
        self.detach(id, None);
        self.free_subtree(id);
    }

    pub(crate) fn alloc(&mut self, node: Node) -> ContentId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ContentId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ContentId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Create a node under `parent` without linking it into the payload
    pub(crate) fn alloc_child(&mut self, parent: ContentId) -> ContentId {
        self.alloc(Node {
            parent: Some(parent),
            ..Node::default()
        })
    }

    /// Release the slot of `id` and every descendant
    pub(crate) fn free_subtree(&mut self, id: ContentId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.take_node(id) else {
                continue;
            };
            match node.payload {
                Payload::Multipart { parts, .. } => stack.extend(parts),
                Payload::Message(child) => stack.push(child),
                Payload::Leaf(_) => {}
            }
        }
    }

    /// Remove a node from its slot, bumping the slot generation
    fn take_node(&mut self, id: ContentId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    pub(crate) fn node(&self, id: ContentId) -> &Node {
        match self.slots.get(id.index as usize) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation => node,
            _ => panic!("stale content handle {id:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: ContentId) -> &mut Node {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation => node,
            _ => panic!("stale content handle {id:?}"),
        }
    }

    /// Raw header block
    pub fn head(&self, id: ContentId) -> &[u8] {
        &self.node(id).head
    }

    /// Replace the raw header block; a missing final line break is added
    ///
    /// Parsed headers are not updated until the next [`parse`](Self::parse).
    pub fn set_head(&mut self, id: ContentId, head: &[u8]) {
        let node = self.node_mut(id);
        node.head = head.to_vec();
        if !node.head.ends_with(b"\n") {
            node.head.push(b'\n');
        }
    }

    /// Raw stored body bytes of a leaf; empty for multipart and message nodes
    ///
    /// Whether the bytes are decoded is reported by
    /// [`is_decoded`](Self::is_decoded).
    pub fn body(&self, id: ContentId) -> &[u8] {
        match &self.node(id).payload {
            Payload::Leaf(body) => body.bytes(),
            _ => &[],
        }
    }

    /// Leaf body with its encoding state
    pub fn leaf_body(&self, id: ContentId) -> Option<&Body> {
        match &self.node(id).payload {
            Payload::Leaf(body) => Some(body),
            _ => None,
        }
    }

    /// Replace the body bytes
    ///
    /// A leaf keeps its decoded/encoded state. A multipart or message node
    /// loses its children and becomes a leaf holding decoded bytes.
    pub fn set_body(&mut self, id: ContentId, body: &[u8]) {
        let body = match &self.node(id).payload {
            Payload::Leaf(Body::Encoded(_)) => Body::Encoded(body.to_vec()),
            _ => Body::Decoded(body.to_vec()),
        };
        self.replace_payload(id, Payload::Leaf(body));
    }

    /// Replace head and body with the two halves of `raw`
    ///
    /// The split happens at the first blank line. The body is stored as wire
    /// bytes; [`parse`](Self::parse) interprets it. Existing children are
    /// destroyed.
    ///
    /// `raw` must use LF line endings. Convert CRLF input with
    /// [`crlf_to_lf`](crate::codec::crlf_to_lf) first.
    pub fn set_content(&mut self, id: ContentId, raw: &[u8]) {
        let (mut head, body) = split_head_body(raw);
        if !head.is_empty() && !head.ends_with(b"\n") {
            head.push(b'\n');
        }
        self.node_mut(id).head = head;
        self.replace_payload(id, Payload::Leaf(Body::Encoded(body)));
    }

    /// Check if the leaf body holds decoded bytes
    ///
    /// Multipart and message nodes always count as decoded.
    pub fn is_decoded(&self, id: ContentId) -> bool {
        match &self.node(id).payload {
            Payload::Leaf(body) => body.is_decoded(),
            _ => true,
        }
    }

    /// Re-tag the leaf body without converting its bytes
    pub fn set_decoded(&mut self, id: ContentId, decoded: bool) {
        if let Payload::Leaf(body) = &mut self.node_mut(id).payload {
            let bytes = std::mem::take(body).into_bytes();
            *body = if decoded {
                Body::Decoded(bytes)
            } else {
                Body::Encoded(bytes)
            };
        }
    }

    /// Bytes before the first part of a multipart node
    pub fn preamble(&self, id: ContentId) -> &[u8] {
        match &self.node(id).payload {
            Payload::Multipart { preamble, .. } => preamble,
            _ => &[],
        }
    }

    /// Bytes after the last part of a multipart node
    pub fn epilogue(&self, id: ContentId) -> &[u8] {
        match &self.node(id).payload {
            Payload::Multipart { epilogue, .. } => epilogue,
            _ => &[],
        }
    }

    /// Replace the preamble of a multipart node
    pub fn set_preamble(&mut self, id: ContentId, bytes: &[u8]) -> Result<()> {
        match &mut self.node_mut(id).payload {
            Payload::Multipart { preamble, .. } => {
                *preamble = bytes.to_vec();
                Ok(())
            }
            _ => Err(MimeError::NotMultipart),
        }
    }

    /// Replace the epilogue of a multipart node
    pub fn set_epilogue(&mut self, id: ContentId, bytes: &[u8]) -> Result<()> {
        match &mut self.node_mut(id).payload {
            Payload::Multipart { epilogue, .. } => {
                *epilogue = bytes.to_vec();
                Ok(())
            }
            _ => Err(MimeError::NotMultipart),
        }
    }

    /// Check if wire bytes are reproduced verbatim
    pub fn is_frozen(&self, id: ContentId) -> bool {
        self.node(id).frozen
    }

    /// Freeze or thaw a node
    ///
    /// Freezing takes effect at the next [`parse`](Self::parse), which
    /// snapshots the body it reads. From then on the node serializes to those
    /// bytes regardless of edits to its headers or children.
    pub fn set_frozen(&mut self, id: ContentId, frozen: bool) {
        self.node_mut(id).frozen = frozen;
    }

    /// Check if the node has any head, body or child content
    pub fn has_content(&self, id: ContentId) -> bool {
        let node = self.node(id);
        !node.head.is_empty()
            || match &node.payload {
                Payload::Leaf(body) => !body.is_empty(),
                Payload::Multipart { parts, .. } => !parts.is_empty(),
                Payload::Message(_) => true,
            }
    }

    /// Reset to an empty node: no headers, head, body or children
    pub fn clear(&mut self, id: ContentId) {
        self.clear_contents(id, true);
        let node = self.node_mut(id);
        node.headers.clear();
        node.head.clear();
        node.payload = Payload::default();
    }

    /// Drop all children, turning the node into an empty leaf
    ///
    /// With `delete` the children are destroyed; otherwise they become
    /// detached roots that stay valid.
    pub fn clear_contents(&mut self, id: ContentId, delete: bool) {
        let payload = std::mem::take(&mut self.node_mut(id).payload);
        let children = match payload {
            Payload::Leaf(body) => {
                self.node_mut(id).payload = Payload::Leaf(body);
                return;
            }
            Payload::Multipart { parts, .. } => parts,
            Payload::Message(child) => vec![child],
        };
        for child in children {
            if delete {
                self.free_subtree(child);
            } else {
                self.node_mut(child).parent = None;
            }
        }
    }

    /// Swap in a new payload, destroying children of the old one
    pub(crate) fn replace_payload(&mut self, id: ContentId, payload: Payload) {
        self.clear_contents(id, true);
        self.node_mut(id).payload = payload;
    }

    /// Parent node, `None` for a root
    pub fn parent(&self, id: ContentId) -> Option<ContentId> {
        self.node(id).parent
    }

    /// Check if the node has no parent
    pub fn is_top_level(&self, id: ContentId) -> bool {
        self.node(id).parent.is_none()
    }

    /// Root of the tree containing `id`
    pub fn top_level(&self, id: ContentId) -> ContentId {
        let mut top = id;
        while let Some(parent) = self.node(top).parent {
            top = parent;
        }
        top
    }

    /// Children: the parts of a multipart node, or the encapsulated message
    pub fn contents(&self, id: ContentId) -> &[ContentId] {
        match &self.node(id).payload {
            Payload::Multipart { parts, .. } => parts,
            Payload::Message(child) => std::slice::from_ref(child),
            Payload::Leaf(_) => &[],
        }
    }

    /// Check if the node is a multipart node with child parts
    pub fn is_multipart_node(&self, id: ContentId) -> bool {
        matches!(self.node(id).payload, Payload::Multipart { .. })
    }

    /// Fresh boundary token for a node that is becoming multipart
    pub(crate) fn new_boundary(&self) -> String {
        let boundary = self.config.new_boundary();
        trace!(boundary = %boundary, "Generated multipart boundary");
        boundary
    }
}
