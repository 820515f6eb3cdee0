use crate::error::{LayoutError, Result};
use crate::tree::element::Element;

use super::normalize::scale_to_area;
use super::squarify::{squarify, Container};
use super::{Bounds, ElementOrder, LayoutConfig, PlacedRect};

/// Hierarchical input: a weighted leaf or a group of further items.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(Element<T>),
    Group(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn leaf(id: T, weight: f64) -> Self {
        Nested::Leaf(Element::new(id, weight))
    }

    pub fn group(children: Vec<Nested<T>>) -> Self {
        Nested::Group(children)
    }

    /// Sum of all leaf weights below this item.
    pub fn total_weight(&self) -> f64 {
        match self {
            Nested::Leaf(element) => element.weight,
            Nested::Group(children) => children.iter().map(Nested::total_weight).sum(),
        }
    }
}

/// Squarified layout over a hierarchy.
///
/// Each level is packed by the summed weight of its items; a group's cell
/// then becomes the container for its children. Only leaves are emitted.
/// Groups without leaves take no space.
pub fn layout_nested<T: Clone>(items: &[Nested<T>], bounds: Bounds, config: &LayoutConfig) -> Result<Vec<PlacedRect<T>>> {
    bounds.validate()?;
    let leaf_count = validate(items, config)?;

    tracing::info!(
        "Laying out {} nested leaves in {:.0}x{:.0} area",
        leaf_count,
        bounds.width,
        bounds.height
    );

    let mut rects = Vec::with_capacity(leaf_count);
    let mut stack: Vec<(&[Nested<T>], Container)> =
        vec![(items, Container::new(0.0, 0.0, bounds.width, bounds.height))];

    while let Some((level, container)) = stack.pop() {
        let mut live: Vec<(&Nested<T>, f64)> = level
            .iter()
            .map(|item| (item, item.total_weight()))
            .filter(|(_, weight)| *weight > 0.0)
            .collect();
        if live.is_empty() {
            continue;
        }
        if config.order == ElementOrder::Descending {
            live.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        let weights: Vec<f64> = live.iter().map(|(_, w)| *w).collect();
        let areas = scale_to_area(&weights, container.width * container.height);
        if container.width <= 0.0 || container.height <= 0.0 {
            tracing::warn!(
                "Nested layout: {} items share a degenerate {:.3}x{:.3} cell",
                live.len(),
                container.width,
                container.height
            );
        }

        let rows = squarify(&areas, container);
        let placed = rows.iter().flat_map(|row| row.cells.iter().copied());

        let mut groups = Vec::new();
        for (&(item, _), cell) in live.iter().zip(placed) {
            match item {
                Nested::Leaf(element) => rects.push(PlacedRect {
                    id: element.id.clone(),
                    x: cell.x,
                    y: cell.y,
                    width: cell.w,
                    height: cell.h,
                }),
                Nested::Group(children) => groups.push((children.as_slice(), Container::from(cell))),
            }
        }
        // Reverse so groups are expanded in placement order
        stack.extend(groups.into_iter().rev());
    }

    Ok(rects)
}

/// Check weights, depth and size before any layout work. Returns the number
/// of leaves.
fn validate<T>(items: &[Nested<T>], config: &LayoutConfig) -> Result<usize> {
    let mut leaves = 0usize;
    let mut total = 0.0f64;
    let mut stack: Vec<(&Nested<T>, u16)> = items.iter().rev().map(|item| (item, 1)).collect();

    while let Some((item, depth)) = stack.pop() {
        if depth > config.max_depth {
            return Err(LayoutError::TooDeep {
                max: config.max_depth,
            });
        }
        match item {
            Nested::Leaf(element) => {
                if !element.weight.is_finite() || element.weight <= 0.0 {
                    return Err(LayoutError::InvalidWeight {
                        index: leaves,
                        weight: element.weight,
                    });
                }
                leaves += 1;
                total += element.weight;
                config.check_len(leaves)?;
            }
            Nested::Group(children) => {
                stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    if !total.is_finite() {
        return Err(LayoutError::WeightOverflow { count: leaves });
    }
    Ok(leaves)
}

/// Flatten a hierarchy into its leaves, in depth-first order.
pub fn leaves<T: Clone>(items: &[Nested<T>]) -> Vec<Element<T>> {
    let mut out = Vec::new();
    let mut stack: Vec<&Nested<T>> = items.iter().rev().collect();
    while let Some(item) = stack.pop() {
        match item {
            Nested::Leaf(element) => out.push(element.clone()),
            Nested::Group(children) => stack.extend(children.iter().rev()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::audit::audit;

    fn sample() -> Vec<Nested<&'static str>> {
        vec![
            Nested::group(vec![Nested::leaf("a1", 6.0), Nested::leaf("a2", 2.0)]),
            Nested::leaf("b", 4.0),
            Nested::group(vec![
                Nested::leaf("c1", 1.0),
                Nested::group(vec![Nested::leaf("c2", 2.0), Nested::leaf("c3", 1.0)]),
            ]),
        ]
    }

    #[test]
    fn leaves_are_placed_inside_their_group_cell() {
        let bounds = Bounds::new(400.0, 300.0);
        let rects = layout_nested(&sample(), bounds, &LayoutConfig::squarified()).unwrap();
        assert_eq!(rects.len(), 6);

        let report = audit(&rects, bounds, 1e-6);
        assert!(report.is_clean(), "{report:?}");
        assert!((report.total_area - bounds.area()).abs() < 1e-6);

        // Group a carries 8/16 of the weight
        let group_a: f64 = rects
            .iter()
            .filter(|r| r.id.starts_with('a'))
            .map(PlacedRect::area)
            .sum();
        assert!((group_a - bounds.area() / 2.0).abs() < 1e-6);
    }

    #[test]
    fn flat_input_matches_plain_squarify() {
        let items = vec![Nested::leaf(0, 3.0), Nested::leaf(1, 2.0), Nested::leaf(2, 1.0)];
        let nested = layout_nested(&items, Bounds::new(60.0, 40.0), &LayoutConfig::squarified()).unwrap();
        let flat = crate::layout::compute_layout(&leaves(&items), Bounds::new(60.0, 40.0), &LayoutConfig::squarified())
            .unwrap();
        assert_eq!(nested, flat);
    }

    #[test]
    fn empty_groups_take_no_space() {
        let items = vec![Nested::group(vec![]), Nested::leaf("x", 1.0)];
        let rects = layout_nested(&items, Bounds::new(10.0, 10.0), &LayoutConfig::squarified()).unwrap();
        assert_eq!(rects.len(), 1);
        assert!((rects[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut item = Nested::leaf(0u32, 1.0);
        for _ in 0..10 {
            item = Nested::group(vec![item]);
        }
        let config = LayoutConfig {
            max_depth: 5,
            ..LayoutConfig::squarified()
        };
        let err = layout_nested(&[item], Bounds::new(10.0, 10.0), &config).unwrap_err();
        assert_eq!(err, LayoutError::TooDeep { max: 5 });
    }

    #[test]
    fn invalid_leaf_rejects_everything() {
        let items = vec![Nested::leaf("ok", 1.0), Nested::group(vec![Nested::leaf("bad", 0.0)])];
        let err = layout_nested(&items, Bounds::new(10.0, 10.0), &LayoutConfig::squarified()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidWeight { index: 1, .. }));
    }

    #[test]
    fn overflowing_group_totals_are_rejected() {
        let items = vec![
            Nested::group(vec![Nested::leaf("a", 1e308), Nested::leaf("b", 1e308)]),
            Nested::leaf("c", 1.0),
        ];
        let err = layout_nested(&items, Bounds::new(10.0, 10.0), &LayoutConfig::squarified()).unwrap_err();
        assert_eq!(err, LayoutError::WeightOverflow { count: 3 });
    }

    #[test]
    fn flattening_keeps_depth_first_order() {
        let ids: Vec<&str> = leaves(&sample()).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["a1", "a2", "b", "c1", "c2", "c3"]);
        assert_eq!(sample().iter().map(Nested::total_weight).sum::<f64>(), 16.0);
    }
}
