use crate::error::Result;
use crate::tree::element::ElementSet;

use super::normalize::normalize;
use super::{Bounds, LayoutConfig, LayoutStrategy, PlacedRect};

/// Real-valued rectangle produced by the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Free space still available for rows that have not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn shortest_edge(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Rectangles for a row laid along the short side of this container.
    ///
    /// Wide (or square) containers get a vertical strip at their left edge,
    /// stacked top to bottom; tall containers get a horizontal strip at the
    /// top, filled left to right.
    pub fn row_coordinates(&self, row: &[f64]) -> Vec<Cell> {
        let sum: f64 = row.iter().sum();
        let mut cells = Vec::with_capacity(row.len());

        if self.width >= self.height {
            let strip = if self.height > 0.0 { sum / self.height } else { 0.0 };
            let mut y = self.y;
            for &area in row {
                let h = if strip > 0.0 { area / strip } else { 0.0 };
                cells.push(Cell { x: self.x, y, w: strip, h });
                y += h;
            }
        } else {
            let strip = if self.width > 0.0 { sum / self.width } else { 0.0 };
            let mut x = self.x;
            for &area in row {
                let w = if strip > 0.0 { area / strip } else { 0.0 };
                cells.push(Cell { x, y: self.y, w, h: strip });
                x += w;
            }
        }

        cells
    }

    /// The space left after a row of total `area` is cut from the short side.
    pub fn cut_area(&self, area: f64) -> Container {
        if self.width >= self.height {
            let strip = if self.height > 0.0 { area / self.height } else { 0.0 };
            Container::new(self.x + strip, self.y, (self.width - strip).max(0.0), self.height)
        } else {
            let strip = if self.width > 0.0 { area / self.width } else { 0.0 };
            Container::new(self.x, self.y + strip, self.width, (self.height - strip).max(0.0))
        }
    }
}

impl From<Cell> for Container {
    fn from(cell: Cell) -> Self {
        Container::new(cell.x, cell.y, cell.w, cell.h)
    }
}

/// A closed row: a contiguous run of the input areas and where it landed.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRow {
    /// Index of the row's first area in the input
    pub first: usize,
    pub areas: Vec<f64>,
    /// The container the row was laid against
    pub container: Container,
    pub cells: Vec<Cell>,
}

impl PackedRow {
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.areas.iter().sum()
    }

    /// Worst aspect ratio of this row against its container's short side.
    pub fn worst_ratio(&self) -> f64 {
        worst_aspect_ratio(&self.areas, self.container.shortest_edge())
    }
}

/// Running sum and extremes of a row, so extending it is O(1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct RowStats {
    sum: f64,
    min: f64,
    max: f64,
}

impl RowStats {
    const EMPTY: RowStats = RowStats {
        sum: 0.0,
        min: f64::INFINITY,
        max: 0.0,
    };

    fn of(row: &[f64]) -> Self {
        row.iter().fold(Self::EMPTY, |stats, &area| stats.with(area))
    }

    fn with(self, area: f64) -> Self {
        RowStats {
            sum: self.sum + area,
            min: self.min.min(area),
            max: self.max.max(area),
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    fn worst_ratio(&self, length: f64) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let side_sq = length * length;
        let sum_sq = self.sum * self.sum;
        ((side_sq * self.max) / sum_sq).max(sum_sq / (side_sq * self.min))
    }

    fn improved_by(&self, next: f64, length: f64) -> bool {
        self.is_empty() || self.worst_ratio(length) >= self.with(next).worst_ratio(length)
    }
}

/// Worst width/height ratio among the rectangles of `row` when laid along a
/// side of `length`: `max(l²·max / s², s² / (l²·min))`.
pub fn worst_aspect_ratio(row: &[f64], length: f64) -> f64 {
    RowStats::of(row).worst_ratio(length)
}

/// Whether appending `next` keeps the row at least as square as it is.
///
/// The published pseudocode compares in the opposite direction; appending
/// wins ties so rows grow unless they get strictly worse.
pub fn improves_ratio(row: &[f64], next: f64, length: f64) -> bool {
    RowStats::of(row).improved_by(next, length)
}

/// Squarified treemap (Bruls, Huizing, van Wijk) over `areas`, which must
/// already sum to the container's area (see [`normalize`]).
///
/// Rows are grown greedily against the shortest edge of the remaining space
/// and closed as soon as one more area would make them strictly less square.
/// Each candidate is checked against the row's running totals, so packing is
/// linear in the number of areas.
pub fn squarify(areas: &[f64], container: Container) -> Vec<PackedRow> {
    let mut rows = Vec::new();
    let mut remaining = container;
    let mut row: Vec<f64> = Vec::new();
    let mut stats = RowStats::EMPTY;
    let mut first = 0;

    for (index, &area) in areas.iter().enumerate() {
        if stats.improved_by(area, remaining.shortest_edge()) {
            row.push(area);
            stats = stats.with(area);
            continue;
        }

        let closed = close_row(first, std::mem::take(&mut row), remaining);
        remaining = remaining.cut_area(stats.sum);
        tracing::trace!(
            "Squarify: closed row of {} at {}, ratio {:.3}",
            closed.len(),
            first,
            stats.worst_ratio(closed.container.shortest_edge())
        );
        rows.push(closed);

        first = index;
        row.push(area);
        stats = RowStats::EMPTY.with(area);
    }

    if !row.is_empty() {
        rows.push(close_row(first, row, remaining));
    }

    rows
}

fn close_row(first: usize, areas: Vec<f64>, container: Container) -> PackedRow {
    let cells = container.row_coordinates(&areas);
    PackedRow {
        first,
        areas,
        container,
        cells,
    }
}

/// Squarified treemap over normalized element weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquarifiedLayout;

impl LayoutStrategy for SquarifiedLayout {
    fn layout<T: Clone>(
        &self,
        elements: &ElementSet<T>,
        bounds: Bounds,
        config: &LayoutConfig,
    ) -> Result<Vec<PlacedRect<T>>> {
        config.check_len(elements.len())?;
        bounds.validate()?;

        let areas = normalize(&elements.weights(), bounds.width, bounds.height)?;
        let rows = squarify(&areas, Container::new(0.0, 0.0, bounds.width, bounds.height));

        let mut rects = Vec::with_capacity(elements.len());
        for row in &rows {
            for (offset, cell) in row.cells.iter().enumerate() {
                rects.push(PlacedRect {
                    id: elements.as_slice()[row.first + offset].id.clone(),
                    x: cell.x,
                    y: cell.y,
                    width: cell.w,
                    height: cell.h,
                });
            }
        }

        tracing::debug!("Squarify: {} elements packed into {} rows", rects.len(), rows.len());
        Ok(rects)
    }
}
