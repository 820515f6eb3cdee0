use super::{Bounds, PlacedRect};

/// Summary of the geometric invariants of one layout result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutAudit {
    /// Sum of all rectangle areas
    pub total_area: f64,
    /// `total_area / bounds.area()`
    pub coverage: f64,
    /// Index pairs whose interiors intersect
    pub overlaps: Vec<(usize, usize)>,
    /// Indices of rectangles reaching outside the bounds or with negative size
    pub out_of_bounds: Vec<usize>,
}

impl LayoutAudit {
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty() && self.out_of_bounds.is_empty()
    }
}

/// Check containment, overlap and coverage. `epsilon` absorbs floating-point
/// noise for real-valued layouts; pass 0 for grid layouts.
///
/// Overlap detection is pairwise, so keep this to diagnostics and tests.
pub fn audit<T>(rects: &[PlacedRect<T>], bounds: Bounds, epsilon: f64) -> LayoutAudit {
    let mut report = LayoutAudit::default();

    for (i, rect) in rects.iter().enumerate() {
        report.total_area += rect.area();

        let inside = rect.width >= -epsilon
            && rect.height >= -epsilon
            && rect.x >= -epsilon
            && rect.y >= -epsilon
            && rect.right() <= bounds.width + epsilon
            && rect.bottom() <= bounds.height + epsilon;
        if !inside {
            report.out_of_bounds.push(i);
        }

        for (j, other) in rects.iter().enumerate().skip(i + 1) {
            if rect.overlaps(other, epsilon) {
                report.overlaps.push((i, j));
            }
        }
    }

    report.coverage = if bounds.area() > 0.0 {
        report.total_area / bounds.area()
    } else {
        0.0
    };
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> PlacedRect<()> {
        PlacedRect { id: (), x, y, width, height }
    }

    #[test]
    fn flags_overlap_and_escape() {
        let rects = [
            rect(0.0, 0.0, 6.0, 10.0),
            rect(5.0, 0.0, 6.0, 10.0),
        ];
        let report = audit(&rects, Bounds::new(10.0, 10.0), 0.0);
        assert_eq!(report.overlaps, vec![(0, 1)]);
        assert_eq!(report.out_of_bounds, vec![1]);
        assert!(!report.is_clean());
        assert!((report.coverage - 1.2).abs() < 1e-12);
    }

    #[test]
    fn exact_tiling_is_clean() {
        let rects = [rect(0.0, 0.0, 5.0, 10.0), rect(5.0, 0.0, 5.0, 10.0)];
        let report = audit(&rects, Bounds::new(10.0, 10.0), 0.0);
        assert!(report.is_clean());
        assert_eq!(report.coverage, 1.0);
    }
}
