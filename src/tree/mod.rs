pub mod aggregate;
pub mod arena;
pub mod element;

use crate::error::{LayoutError, Result};

use self::arena::{SliceNode, SliceTree, MAX_SLICE_ELEMENTS};
use self::element::ElementSet;

/// Partition `elements` into a binary slice tree (slice-and-dice).
///
/// `size` is the fraction of the target area the root represents (normally
/// 1.0) and `slice_width` the cumulative-share threshold that bounds each
/// primary group. An empty set yields an empty tree.
///
/// The split axis is not decided here; the mapper picks it per rectangle, so
/// the same tree renders into any aspect ratio.
pub fn build_slice_tree<T>(elements: &ElementSet<T>, size: f64, slice_width: f64) -> Result<SliceTree> {
    if !(size > 0.0 && size <= 1.0) {
        return Err(LayoutError::InvalidFraction(size));
    }
    if !(slice_width > 0.0 && slice_width < 1.0) {
        return Err(LayoutError::InvalidSliceRatio(slice_width));
    }

    let all = elements.as_slice();
    if all.len() > MAX_SLICE_ELEMENTS {
        return Err(LayoutError::TooManyElements {
            count: all.len(),
            max: MAX_SLICE_ELEMENTS,
        });
    }
    // n leaves → 2n - 1 nodes
    let mut tree = SliceTree::with_capacity((2 * all.len()).saturating_sub(1));
    if all.is_empty() {
        return Ok(tree);
    }

    let root = tree.push(SliceNode::new(0..all.len(), size, 1.0))?;
    tree.root = Some(root);

    // Iterative to keep stack usage flat: every level consumes at least one
    // element, so deep trees appear on skewed inputs.
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        let range = tree.get(id).elements.clone();
        if range.len() < 2 {
            continue;
        }

        let (split, running) = aggregate::primary_split(&all[range.clone()], slice_width);
        let node_size = tree.get(id).size;
        let mid = range.start + split;

        let primary = tree.push(SliceNode::new(range.start..mid, node_size * running, running))?;
        let remainder = tree.push(SliceNode::new(
            mid..range.end,
            node_size * (1.0 - running),
            1.0 - running,
        ))?;
        tree.get_mut(id).children = Some((primary, remainder));

        pending.push(remainder);
        pending.push(primary);
    }

    tracing::debug!(
        "Slice tree built: {} elements, {} nodes, depth {}",
        all.len(),
        tree.len(),
        tree.depth()
    );

    Ok(tree)
}
