use std::ops::Range;

use crate::error::{LayoutError, Result};

/// Most elements a slice tree can hold: `n` leaves need `2n - 1` nodes, all
/// addressable by a `u32`.
pub const MAX_SLICE_ELEMENTS: usize = (u32::MAX / 2) as usize;

/// Index into the arena `Vec<SliceNode>`. Uses u32 to keep nodes compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceId(pub u32);

impl SliceId {
    /// `None` if `index` does not fit in a `u32`.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(SliceId)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single slice, stored in a flat arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceNode {
    /// Contiguous range of the input elements covered by this slice
    pub elements: Range<usize>,
    /// Fraction of the root area (root = 1.0)
    pub size: f64,
    /// Fraction of the parent's area (root = 1.0). Siblings sum to 1.
    pub share: f64,
    /// `(primary, remainder)` for internal nodes, `None` for leaves
    pub children: Option<(SliceId, SliceId)>,
}

impl SliceNode {
    pub fn new(elements: Range<usize>, size: f64, share: f64) -> Self {
        Self {
            elements,
            size,
            share,
            children: None,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Binary slice tree stored as a flat arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct SliceTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<SliceNode>,
    /// Root node index (None for an empty input)
    pub root: Option<SliceId>,
}

impl SliceTree {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Append a node. Returns the new node's ID.
    pub fn push(&mut self, node: SliceNode) -> Result<SliceId> {
        let id = SliceId::from_index(self.nodes.len()).ok_or(LayoutError::TooManyElements {
            count: self.nodes.len() / 2 + 1,
            max: MAX_SLICE_ELEMENTS,
        })?;
        self.nodes.push(node);
        Ok(id)
    }

    pub fn get(&self, id: SliceId) -> &SliceNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: SliceId) -> &mut SliceNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the children of a node, primary first.
    pub fn children(&self, parent: SliceId) -> ChildIter {
        let (first, second) = match self.get(parent).children {
            Some((primary, remainder)) => (Some(primary), Some(remainder)),
            None => (None, None),
        };
        ChildIter {
            pending: [second, first],
            len: usize::from(first.is_some()) * 2,
        }
    }

    /// Iterate over leaves in placement order (depth-first, primary first).
    pub fn leaves(&self) -> LeafIter<'_> {
        LeafIter {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(SliceId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in self.children(id) {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }
}

/// Iterator over the (zero or two) children of a node.
pub struct ChildIter {
    pending: [Option<SliceId>; 2],
    len: usize,
}

impl Iterator for ChildIter {
    type Item = SliceId;

    fn next(&mut self) -> Option<SliceId> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.pending[self.len].take()
    }
}

/// Depth-first leaf iterator using an explicit stack.
pub struct LeafIter<'a> {
    tree: &'a SliceTree,
    stack: Vec<SliceId>,
}

impl<'a> Iterator for LeafIter<'a> {
    type Item = SliceId;

    fn next(&mut self) -> Option<SliceId> {
        while let Some(id) = self.stack.pop() {
            match self.tree.get(id).children {
                Some((primary, remainder)) => {
                    self.stack.push(remainder);
                    self.stack.push(primary);
                }
                None => return Some(id),
            }
        }
        None
    }
}
