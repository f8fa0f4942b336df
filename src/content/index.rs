//! Dotted 1-based addresses of nodes in a content tree

use std::fmt;
use std::str::FromStr;

use crate::MimeError;

/// Path from a root node to one of its descendants
///
/// Each entry is the 1-based position among the siblings at that depth,
/// outermost first. The empty index addresses the root itself.
///
/// ```
/// use nntp_mime::ContentIndex;
///
/// let index: ContentIndex = "2.1".parse().unwrap();
/// assert_eq!(index.as_slice(), &[2, 1]);
/// assert_eq!(index.to_string(), "2.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentIndex(Vec<u32>);

impl ContentIndex {
    /// The empty index, addressing the root
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from 1-based positions, outermost first
    ///
    /// Returns `None` if any position is 0.
    pub fn from_path(path: Vec<u32>) -> Option<Self> {
        path.iter().all(|&i| i > 0).then_some(Self(path))
    }

    /// Check if the index addresses a descendant rather than the root
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the empty (root) index
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Positions, outermost first
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Add an outer level
    ///
    /// Used when building an index bottom-up: the position of a node's
    /// parent among its siblings goes in front.
    pub fn push(&mut self, position: u32) {
        self.0.insert(0, position);
    }

    /// Remove and return the outermost level
    pub fn pop(&mut self) -> Option<u32> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    /// Remove and return the innermost level, moving to the parent
    pub fn up(&mut self) -> Option<u32> {
        self.0.pop()
    }
}

impl fmt::Display for ContentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, position) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{position}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentIndex {
    type Err = MimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::new());
        }
        let path = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .ok()
                    .filter(|&i| i > 0)
                    .ok_or_else(|| MimeError::Malformed(format!("Invalid content index: {s}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(path))
    }
}
