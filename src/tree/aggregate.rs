use super::element::Element;

/// Sum of all weights, accumulated in list order.
pub fn total_weight<T>(elements: &[Element<T>]) -> f64 {
    let mut total = 0.0;
    for element in elements {
        total += element.weight;
    }
    total
}

/// Sort elements by weight (descending), keeping input order for ties.
/// Squarified packing produces its best aspect ratios on descending input.
pub fn sort_by_weight_desc<T>(elements: &mut [Element<T>]) {
    elements.sort_by(|a, b| b.weight.total_cmp(&a.weight));
}

/// Split a level of the slice tree: returns how many leading elements form the
/// primary group and the fraction of the level's weight they carry.
///
/// Elements are taken while the running share has not yet exceeded
/// `slice_width`, so the first element is always included. When that would
/// swallow the whole level, the last element is handed back so both groups
/// are non-empty.
pub fn primary_split<T>(level: &[Element<T>], slice_width: f64) -> (usize, f64) {
    let total = total_weight(level);
    let mut running = 0.0;
    let mut split = 0;

    for element in level {
        if running > slice_width {
            break;
        }
        running += element.weight / total;
        split += 1;
    }

    if split == level.len() && split > 1 {
        split -= 1;
        running = 0.0;
        for element in &level[..split] {
            running += element.weight / total;
        }
        tracing::debug!(
            "Slice of {} elements never crossed width {:.3}; last element moved to remainder",
            level.len(),
            slice_width
        );
    }

    (split, running)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(weights: &[f64]) -> Vec<Element<usize>> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Element::new(i, w))
            .collect()
    }

    #[test]
    fn first_element_always_primary() {
        let level = elements(&[90.0, 5.0, 5.0]);
        let (split, running) = primary_split(&level, 0.35);
        assert_eq!(split, 1);
        assert!((running - 0.9).abs() < 1e-12);
    }

    #[test]
    fn takes_elements_until_share_exceeds_width() {
        let level = elements(&[1.0, 1.0, 1.0]);
        let (split, running) = primary_split(&level, 0.35);
        assert_eq!(split, 2);
        assert!((running - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn never_swallows_the_whole_level() {
        let level = elements(&[1.0, 10.0]);
        let (split, running) = primary_split(&level, 0.35);
        assert_eq!(split, 1);
        assert!((running - 1.0 / 11.0).abs() < 1e-12);
    }
}
