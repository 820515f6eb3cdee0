use crate::error::{LayoutError, Result};
use crate::tree::arena::{SliceId, SliceTree};
use crate::tree::build_slice_tree;
use crate::tree::element::ElementSet;

use super::{Bounds, LayoutConfig, LayoutStrategy, PlacedRect, RoundingPolicy};

/// Largest grid extent slice-and-dice accepts along either axis. Keeps every
/// sum of two extents well inside `i64`.
pub const MAX_GRID_EXTENT: i64 = i32::MAX as i64;

/// Integer rectangle on the layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl GridRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }
}

/// A leaf slice mapped onto the grid: `element` indexes the input set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedCell {
    pub element: usize,
    pub rect: GridRect,
}

/// Walk `tree` and place every leaf inside a `width` x `height` grid.
///
/// The split axis follows the aspect ratio of each container: wide or square
/// containers stack their children along X, tall ones along Y. Extents are
/// rounded to whole grid units, and only the outer boundary is enforced once
/// all cells are placed.
pub fn map_to_rectangles(tree: &SliceTree, width: i64, height: i64, rounding: RoundingPolicy) -> Vec<MappedCell> {
    let Some(root) = tree.root else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(tree.len() / 2 + 1);
    let mut stack: Vec<(SliceId, GridRect)> = vec![(root, GridRect::new(0, 0, width, height))];

    while let Some((id, area)) = stack.pop() {
        let node = tree.get(id);
        let Some((primary, remainder)) = node.children else {
            cells.push(MappedCell {
                element: node.elements.start,
                rect: area,
            });
            continue;
        };

        let horizontal = area.width >= area.height;
        let extent = if horizontal { area.width } else { area.height };
        let (first, second) = child_extents(extent, tree.get(primary).share, tree.get(remainder).share, rounding);

        let (first_rect, second_rect) = if horizontal {
            (
                GridRect::new(area.x, area.y, first, area.height),
                GridRect::new(area.x.saturating_add(first), area.y, second, area.height),
            )
        } else {
            (
                GridRect::new(area.x, area.y, area.width, first),
                GridRect::new(area.x, area.y.saturating_add(first), area.width, second),
            )
        };

        // Remainder below primary so primary subtrees are emitted first
        stack.push((remainder, second_rect));
        stack.push((primary, first_rect));
    }

    let mut clamped = 0usize;
    for cell in &mut cells {
        if clamp_to_bounds(&mut cell.rect, width, height) {
            clamped += 1;
        }
    }
    if clamped > 0 {
        tracing::debug!(
            "Clamped {} of {} rectangles to the {}x{} boundary",
            clamped,
            cells.len(),
            width,
            height
        );
    }

    cells
}

fn round_extent(extent: i64, share: f64) -> i64 {
    (extent as f64 * share).round() as i64
}

fn child_extents(extent: i64, primary_share: f64, remainder_share: f64, rounding: RoundingPolicy) -> (i64, i64) {
    match rounding {
        RoundingPolicy::PerChild => (
            round_extent(extent, primary_share),
            round_extent(extent, remainder_share),
        ),
        RoundingPolicy::Cumulative => {
            let primary = round_extent(extent, primary_share).clamp(0, extent);
            (primary, extent - primary)
        }
    }
}

/// Pull a rectangle back inside `[0, width] x [0, height]`.
/// Returns whether anything changed.
fn clamp_to_bounds(rect: &mut GridRect, width: i64, height: i64) -> bool {
    let before = *rect;
    rect.x = rect.x.min(width);
    rect.y = rect.y.min(height);
    if rect.x.checked_add(rect.width).map_or(true, |right| right > width) {
        rect.width = width - rect.x;
    }
    if rect.y.checked_add(rect.height).map_or(true, |bottom| bottom > height) {
        rect.height = height - rect.y;
    }
    *rect != before
}

/// Slice-and-dice treemap: slice tree construction plus grid mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceAndDiceLayout;

impl LayoutStrategy for SliceAndDiceLayout {
    fn layout<T: Clone>(
        &self,
        elements: &ElementSet<T>,
        bounds: Bounds,
        config: &LayoutConfig,
    ) -> Result<Vec<PlacedRect<T>>> {
        config.check_len(elements.len())?;
        config.validate()?;
        bounds.validate()?;

        let width = bounds.width.round() as i64;
        let height = bounds.height.round() as i64;
        if width < 1 || height < 1 {
            return Err(LayoutError::DegenerateArea {
                width: bounds.width,
                height: bounds.height,
            });
        }
        if width > MAX_GRID_EXTENT || height > MAX_GRID_EXTENT {
            return Err(LayoutError::AreaTooLarge {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let tree = build_slice_tree(elements, 1.0, config.min_slice_ratio)?;
        let cells = map_to_rectangles(&tree, width, height, config.rounding);

        Ok(cells
            .into_iter()
            .map(|cell| PlacedRect {
                id: elements.as_slice()[cell.element].id.clone(),
                x: cell.rect.x as f64,
                y: cell.rect.y as f64,
                width: cell.rect.width as f64,
                height: cell.rect.height as f64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::audit::audit;
    use crate::layout::{compute_layout, ElementOrder};
    use crate::tree::element::Element;

    const REFERENCE: [f64; 12] = [24.0, 45.0, 32.0, 87.0, 34.0, 58.0, 10.0, 4.0, 5.0, 9.0, 52.0, 34.0];

    fn set(weights: &[f64]) -> ElementSet<usize> {
        ElementSet::from_pairs(weights.iter().copied().enumerate()).unwrap()
    }

    fn grid(rects: &[PlacedRect<usize>]) -> Vec<(usize, i64, i64, i64, i64)> {
        rects
            .iter()
            .map(|r| (r.id, r.x as i64, r.y as i64, r.width as i64, r.height as i64))
            .collect()
    }

    #[test]
    fn reference_input_golden_layout() {
        let rects = SliceAndDiceLayout
            .layout(&set(&REFERENCE), Bounds::new(400.0, 300.0), &LayoutConfig::default())
            .unwrap();
        assert_eq!(
            grid(&rects),
            vec![
                (0, 0, 0, 66, 110),
                (1, 66, 0, 125, 110),
                (2, 0, 110, 51, 190),
                (3, 51, 110, 140, 190),
                (4, 191, 0, 77, 134),
                (5, 268, 0, 132, 134),
                (6, 191, 134, 53, 58),
                (7, 244, 134, 47, 26),
                (8, 244, 160, 47, 32),
                (9, 291, 134, 47, 58),
                (10, 191, 192, 147, 108),
                (11, 338, 134, 62, 166),
            ]
        );
    }

    #[test]
    fn reference_input_descending_golden_layout() {
        let config = LayoutConfig {
            order: ElementOrder::Descending,
            ..LayoutConfig::default()
        };
        let input: Vec<Element<usize>> = REFERENCE
            .iter()
            .enumerate()
            .map(|(i, &w)| Element::new(i, w))
            .collect();
        let rects = compute_layout(&input, Bounds::new(400.0, 300.0), &config).unwrap();
        let by_weight: Vec<(i64, i64, i64, i64, i64)> = rects
            .iter()
            .map(|r| (REFERENCE[r.id] as i64, r.x as i64, r.y as i64, r.width as i64, r.height as i64))
            .collect();
        assert_eq!(
            by_weight,
            vec![
                (87, 0, 0, 147, 180),
                (58, 0, 180, 147, 120),
                (52, 147, 0, 136, 117),
                (45, 283, 0, 117, 117),
                (34, 147, 117, 113, 92),
                (34, 147, 209, 113, 91),
                (32, 260, 117, 140, 70),
                (24, 260, 187, 65, 113),
                (10, 325, 187, 75, 40),
                (9, 325, 227, 38, 73),
                (5, 363, 227, 37, 41),
                (4, 363, 268, 37, 32),
            ]
        );
    }

    #[test]
    fn reference_layout_is_deterministic_and_tiles_the_canvas() {
        let bounds = Bounds::new(400.0, 300.0);
        let first = SliceAndDiceLayout
            .layout(&set(&REFERENCE), bounds, &LayoutConfig::default())
            .unwrap();
        for _ in 0..5 {
            let again = SliceAndDiceLayout
                .layout(&set(&REFERENCE), bounds, &LayoutConfig::default())
                .unwrap();
            assert_eq!(first, again);
        }
        let report = audit(&first, bounds, 0.0);
        assert_eq!(report.total_area, 120_000.0);
        assert!(report.overlaps.is_empty());
        assert!(report.out_of_bounds.is_empty());
    }

    #[test]
    fn axis_follows_container_aspect() {
        let tree = build_slice_tree(&set(&[1.0, 1.0]), 1.0, 0.35).unwrap();
        let wide = map_to_rectangles(&tree, 400, 300, RoundingPolicy::PerChild);
        assert_eq!(wide[0].rect, GridRect::new(0, 0, 200, 300));
        assert_eq!(wide[1].rect, GridRect::new(200, 0, 200, 300));

        let tall = map_to_rectangles(&tree, 300, 400, RoundingPolicy::PerChild);
        assert_eq!(tall[0].rect, GridRect::new(0, 0, 300, 200));
        assert_eq!(tall[1].rect, GridRect::new(0, 200, 300, 200));
    }

    #[test]
    fn per_child_rounding_is_clamped_only_at_the_boundary() {
        // 2.5 + 2.5 both round up, pushing the remainder one unit past the edge
        let tree = build_slice_tree(&set(&[1.0, 1.0]), 1.0, 0.35).unwrap();
        let cells = map_to_rectangles(&tree, 5, 1, RoundingPolicy::PerChild);
        assert_eq!(cells[0].rect, GridRect::new(0, 0, 3, 1));
        assert_eq!(cells[1].rect, GridRect::new(3, 0, 2, 1));
    }

    #[test]
    fn cumulative_rounding_tiles_exactly() {
        let tree = build_slice_tree(&set(&[1.0; 5]), 1.0, 0.35).unwrap();
        let cells = map_to_rectangles(&tree, 400, 400, RoundingPolicy::Cumulative);
        let area: i64 = cells.iter().map(|c| c.rect.width * c.rect.height).sum();
        assert_eq!(area, 160_000);
    }

    #[test]
    fn equal_weights_in_a_square_get_equal_areas() {
        let bounds = Bounds::new(400.0, 400.0);
        for n in [2usize, 4, 9, 16] {
            let rects = SliceAndDiceLayout
                .layout(&set(&vec![1.0; n]), bounds, &LayoutConfig::default())
                .unwrap();
            let expected = bounds.area() / n as f64;
            for r in &rects {
                // one grid unit of drift along either side
                assert!((r.area() - expected).abs() <= 400.0, "n={n} area={}", r.area());
            }
        }
    }

    #[test]
    fn clamp_pulls_drifted_origin_back() {
        let mut rect = GridRect::new(12, 3, 4, 4);
        assert!(clamp_to_bounds(&mut rect, 10, 10));
        assert_eq!(rect, GridRect::new(10, 3, 0, 4));
    }

    #[test]
    fn sub_unit_bounds_are_degenerate() {
        let err = SliceAndDiceLayout
            .layout(&set(&[1.0]), Bounds::new(0.4, 10.0), &LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateArea { .. }));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let err = SliceAndDiceLayout
            .layout(&set(&[1.0, 1.0]), Bounds::new(1e19, 1.0), &LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::AreaTooLarge { .. }));

        // the largest accepted grid still stays inside its bounds
        let bounds = Bounds::new(MAX_GRID_EXTENT as f64, 1.0);
        let rects = SliceAndDiceLayout
            .layout(&set(&[1.0, 1.0]), bounds, &LayoutConfig::default())
            .unwrap();
        assert!(audit(&rects, bounds, 0.0).out_of_bounds.is_empty());
    }

    #[test]
    fn mapper_saturates_instead_of_overflowing() {
        let tree = build_slice_tree(&set(&[1.0, 1.0]), 1.0, 0.35).unwrap();
        let cells = map_to_rectangles(&tree, i64::MAX, 1, RoundingPolicy::PerChild);
        assert_eq!(cells.len(), 2);
        for cell in &cells {
            assert!(cell.rect.x <= i64::MAX - cell.rect.width);
        }
    }
}
