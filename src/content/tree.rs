//! Tree mutation and addressing
//!
//! Adding a part to a single-part node promotes it: its MIME headers and
//! body move into a new first child and the node becomes
//! `multipart/mixed`. Removing parts until one is left collapses the node
//! back, so promotion followed by removal restores the original.

use tracing::trace;

use super::{Body, ContentId, ContentIndex, ContentTree, Payload};
use crate::headers::{ContentCategory, ContentType, Encoding, Header};
use crate::{MimeError, Result};

impl ContentTree {
    /// Add `child` as a part of `id`
    ///
    /// `child` is detached from its current parent first. A single-part
    /// `id` is promoted to `multipart/mixed`, its own content becoming the
    /// first part. With `prepend` the child becomes the first part, otherwise
    /// the last. Adding a node that is already a part of `id` moves it.
    pub fn add_content(&mut self, id: ContentId, child: ContentId, prepend: bool) -> Result<()> {
        self.ensure_not_message(id)?;
        if child == id || self.is_ancestor(child, id) {
            return Err(MimeError::CyclicContent);
        }

        if self.parent(child) == Some(id) {
            if let Payload::Multipart { parts, .. } = &mut self.node_mut(id).payload {
                parts.retain(|&p| p != child);
                insert_part(parts, child, prepend);
            }
            return Ok(());
        }

        self.detach(child, Some(id));
        self.ensure_multipart(id);
        if let Payload::Multipart { parts, .. } = &mut self.node_mut(id).payload {
            insert_part(parts, child, prepend);
        }
        self.node_mut(child).parent = Some(id);
        Ok(())
    }

    /// Remove the part `child` from `id`
    ///
    /// With `delete` the part and its subtree are destroyed; otherwise it
    /// becomes a detached root. When a single part remains, `id` collapses
    /// into it. Removing a node that is not a part of `id` does nothing.
    pub fn remove_content(&mut self, id: ContentId, child: ContentId, delete: bool) -> Result<()> {
        self.ensure_not_message(id)?;
        let Payload::Multipart { parts, .. } = &mut self.node_mut(id).payload else {
            return Ok(());
        };
        let Some(pos) = parts.iter().position(|&p| p == child) else {
            return Ok(());
        };
        parts.remove(pos);

        if delete {
            self.free_subtree(child);
        } else {
            self.node_mut(child).parent = None;
        }
        self.settle_multipart(id, None);
        Ok(())
    }

    /// Destroy the part `old` of `id` and add `new` as its last part
    ///
    /// Does nothing if `old` is not a part of `id`.
    pub fn replace_content(&mut self, id: ContentId, old: ContentId, new: ContentId) -> Result<()> {
        self.ensure_not_message(id)?;
        if old == new || !self.contents(id).contains(&old) {
            return Ok(());
        }
        if new == id || self.is_ancestor(new, id) {
            return Err(MimeError::CyclicContent);
        }

        if self.parent(new) != Some(id) {
            self.detach(new, Some(id));
        }
        self.free_subtree(old);
        if let Payload::Multipart { parts, .. } = &mut self.node_mut(id).payload {
            parts.retain(|&p| p != old && p != new);
            parts.push(new);
        }
        self.node_mut(new).parent = Some(id);
        Ok(())
    }

    /// Check if the node declares an encapsulated `message/rfc822` body
    pub fn body_is_message(&self, id: ContentId) -> bool {
        self.is_message_type(id)
    }

    /// The encapsulated message node, once parsed
    pub fn body_as_message(&self, id: ContentId) -> Option<ContentId> {
        match self.node(id).payload {
            Payload::Message(child) => Some(child),
            _ => None,
        }
    }

    /// Resolve `index` relative to `root`
    ///
    /// The empty index resolves to `root` itself.
    pub fn content(&self, root: ContentId, index: &ContentIndex) -> Option<ContentId> {
        index.as_slice().iter().try_fold(root, |current, &position| {
            let pos = (position as usize).checked_sub(1)?;
            self.contents(current).get(pos).copied()
        })
    }

    /// Index of `node` relative to `root`
    ///
    /// `root` itself has the empty index. Returns `None` if `node` is not in
    /// the subtree of `root`.
    pub fn index_for_content(&self, root: ContentId, node: ContentId) -> Option<ContentIndex> {
        let mut index = ContentIndex::new();
        let mut current = node;
        while current != root {
            let parent = self.parent(current)?;
            let position = self.contents(parent).iter().position(|&c| c == current)?;
            index.push(position as u32 + 1);
            current = parent;
        }
        Some(index)
    }

    /// Index of `id` relative to its top-level ancestor
    pub fn index(&self, id: ContentId) -> ContentIndex {
        self.index_for_content(self.top_level(id), id)
            .unwrap_or_default()
    }

    /// Check if `ancestor` is a strict ancestor of `node`
    pub(super) fn is_ancestor(&self, ancestor: ContentId, node: ContentId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    fn ensure_not_message(&self, id: ContentId) -> Result<()> {
        if self.body_is_message(id) || self.body_as_message(id).is_some() {
            return Err(MimeError::EncapsulatedMessage);
        }
        Ok(())
    }

    /// Unlink `child` from its parent, making it a root
    ///
    /// The former parent is collapsed or downgraded if too few parts remain,
    /// unless that would invalidate `keep` or one of its ancestors.
    pub(super) fn detach(&mut self, child: ContentId, keep: Option<ContentId>) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        self.node_mut(child).parent = None;

        let payload = &mut self.node_mut(parent).payload;
        match payload {
            Payload::Multipart { parts, .. } => parts.retain(|&p| p != child),
            Payload::Message(_) => *payload = Payload::default(),
            Payload::Leaf(_) => {}
        }
        self.settle_multipart(parent, keep);
    }

    /// Collapse a multipart node left with one part, or downgrade one left
    /// with none
    fn settle_multipart(&mut self, id: ContentId, keep: Option<ContentId>) {
        let survivor = match &self.node(id).payload {
            Payload::Multipart { parts, .. } => match parts.as_slice() {
                [] => None,
                [survivor] => Some(*survivor),
                _ => return,
            },
            _ => return,
        };
        match survivor {
            None => self.downgrade_empty(id),
            Some(survivor) => {
                let protected =
                    keep.is_some_and(|keep| keep == survivor || self.is_ancestor(survivor, keep));
                if !protected {
                    self.collapse(id, survivor);
                }
            }
        }
    }

    fn downgrade_empty(&mut self, id: ContentId) {
        trace!("Last part removed, downgrading to text/plain");
        self.node_mut(id).payload = Payload::Leaf(Body::default());
        let ct = self.content_type_mut(id);
        ct.clear();
        ct.set_mime_type("text/plain");
        ct.set_charset("us-ascii");
        let category = self.structural_category(id);
        self.content_type_mut(id).set_category(category);
    }

    /// Role of `id` as seen from its parent
    fn structural_category(&self, id: ContentId) -> ContentCategory {
        let Some(parent) = self.parent(id) else {
            return ContentCategory::Single;
        };
        if self.body_as_message(parent).is_some() {
            return ContentCategory::Single;
        }
        match self.content_type(parent) {
            Some(ct) if ct.is_sub_type("alternative") => ContentCategory::AlternativePart,
            _ => ContentCategory::MixedPart,
        }
    }

    /// Merge the single remaining part into `id`
    ///
    /// The merged node takes its category from its own position in the tree.
    fn collapse(&mut self, id: ContentId, survivor: ContentId) {
        let category = self.structural_category(id);
        let Some(part) = self.take_node(survivor) else {
            return;
        };
        trace!("Collapsing multipart with a single part");

        self.node_mut(id)
            .headers
            .retain(|h| !matches!(h, Header::ContentType(_) | Header::ContentTransferEncoding(_)));
        for header in part.headers {
            if matches!(&header, Header::ContentType(ct) if ct.is_empty()) {
                continue;
            }
            self.set_header(id, header);
        }
        if self.header::<ContentType>(id).is_some() {
            self.content_type_mut(id).set_category(category);
        }

        for &grandchild in payload_children(&part.payload) {
            self.node_mut(grandchild).parent = Some(id);
        }
        self.node_mut(id).payload = part.payload;
    }

    /// Turn `id` into a multipart node, promoting single-part content
    fn ensure_multipart(&mut self, id: ContentId) {
        let body = match std::mem::take(&mut self.node_mut(id).payload) {
            Payload::Leaf(body) => body,
            other => {
                self.node_mut(id).payload = other;
                return;
            }
        };

        let declared_multipart = self.content_type(id).is_some_and(ContentType::is_multipart);
        if declared_multipart {
            // Former body text stays in front of the first part
            if self.content_type(id).and_then(ContentType::boundary).is_none() {
                let boundary = self.new_boundary();
                self.content_type_mut(id).set_boundary(boundary);
            }
            self.node_mut(id).payload = Payload::Multipart {
                parts: Vec::new(),
                preamble: body.into_bytes(),
                epilogue: Vec::new(),
            };
            return;
        }

        trace!("Promoting single-part content to multipart/mixed");
        let main = self.alloc_child(id);
        let (mime, other): (Vec<Header>, Vec<Header>) = std::mem::take(&mut self.node_mut(id).headers)
            .into_iter()
            .partition(Header::is_mime_header);
        self.node_mut(id).headers = other;
        let main_node = self.node_mut(main);
        main_node.headers = mime;
        main_node.payload = Payload::Leaf(body);
        self.content_type_mut(main)
            .set_category(ContentCategory::MixedPart);

        let boundary = self.new_boundary();
        let ct = self.content_type_mut(id);
        ct.set_mime_type("multipart/mixed");
        ct.set_boundary(boundary);
        ct.set_category(ContentCategory::Container);
        self.content_transfer_encoding_mut(id)
            .set_encoding(Encoding::SevenBit);

        self.node_mut(id).payload = Payload::Multipart {
            parts: vec![main],
            preamble: Vec::new(),
            epilogue: Vec::new(),
        };
    }
}

fn insert_part(parts: &mut Vec<ContentId>, child: ContentId, prepend: bool) {
    if prepend {
        parts.insert(0, child);
    } else {
        parts.push(child);
    }
}

fn payload_children(payload: &Payload) -> &[ContentId] {
    match payload {
        Payload::Multipart { parts, .. } => parts,
        Payload::Message(child) => std::slice::from_ref(child),
        Payload::Leaf(_) => &[],
    }
}
