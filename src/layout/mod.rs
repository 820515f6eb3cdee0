pub mod audit;
pub mod nested;
pub mod normalize;
pub mod slice_dice;
pub mod squarify;

use rayon::prelude::*;

use crate::error::{LayoutError, Result};
use crate::tree::arena::MAX_SLICE_ELEMENTS;
use crate::tree::element::{Element, ElementSet};

pub use self::slice_dice::SliceAndDiceLayout;
pub use self::squarify::SquarifiedLayout;

/// Target canvas for one layout call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Both sides must be positive and finite, and so must their product.
    pub fn validate(&self) -> Result<()> {
        let ok = |side: f64| side.is_finite() && side > 0.0;
        if !(ok(self.width) && ok(self.height)) {
            return Err(LayoutError::DegenerateArea {
                width: self.width,
                height: self.height,
            });
        }
        if !self.area().is_finite() {
            return Err(LayoutError::AreaTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// A positioned rectangle in the treemap layout, tagged with the caller's id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect<T> {
    pub id: T,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl<T> PlacedRect<T> {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the interiors intersect, allowing `epsilon` of shared edge.
    pub fn overlaps<U>(&self, other: &PlacedRect<U>, epsilon: f64) -> bool {
        self.x + epsilon < other.right()
            && other.x + epsilon < self.right()
            && self.y + epsilon < other.bottom()
            && other.y + epsilon < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Recursive binary split by cumulative weight share, integer grid output
    #[default]
    SliceAndDice,
    /// Bruls/Huizing/van Wijk row packing, real-valued output
    Squarified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementOrder {
    /// Lay out in the order the caller supplied
    #[default]
    Input,
    /// Stable sort by weight, heaviest first
    Descending,
}

/// How slice-and-dice turns fractional extents into grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    /// Round each child independently; only the outer boundary is clamped.
    #[default]
    PerChild,
    /// Round the primary child and give the remainder what is left, so
    /// siblings tile their parent exactly.
    Cumulative,
}

/// Configuration for one layout call.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub algorithm: Algorithm,
    /// Cumulative share threshold for slice-and-dice primary groups, in (0, 1)
    pub min_slice_ratio: f64,
    pub order: ElementOrder,
    pub rounding: RoundingPolicy,
    /// Inputs longer than this are rejected before any work. Values above
    /// the arena's addressable limit are capped to it.
    pub max_elements: usize,
    /// Maximum group nesting for nested layouts
    pub max_depth: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::SliceAndDice,
            min_slice_ratio: 0.35,
            order: ElementOrder::Input,
            rounding: RoundingPolicy::PerChild,
            max_elements: 1_000_000,
            max_depth: 64,
        }
    }
}

impl LayoutConfig {
    pub fn squarified() -> Self {
        Self {
            algorithm: Algorithm::Squarified,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_slice_ratio > 0.0 && self.min_slice_ratio < 1.0) {
            return Err(LayoutError::InvalidSliceRatio(self.min_slice_ratio));
        }
        Ok(())
    }

    pub(crate) fn check_len(&self, count: usize) -> Result<()> {
        let max = self.max_elements.min(MAX_SLICE_ELEMENTS);
        if count > max {
            return Err(LayoutError::TooManyElements { count, max });
        }
        Ok(())
    }
}

/// One treemap algorithm. Implementations validate everything up front and
/// either return a rectangle for every element or fail as a whole.
pub trait LayoutStrategy {
    fn layout<T: Clone>(
        &self,
        elements: &ElementSet<T>,
        bounds: Bounds,
        config: &LayoutConfig,
    ) -> Result<Vec<PlacedRect<T>>>;
}

/// Lay out `elements` inside `bounds` with the algorithm `config` selects.
pub fn compute_layout<T: Clone>(
    elements: &[Element<T>],
    bounds: Bounds,
    config: &LayoutConfig,
) -> Result<Vec<PlacedRect<T>>> {
    config.check_len(elements.len())?;
    config.validate()?;
    bounds.validate()?;
    let mut set = ElementSet::new(elements.to_vec())?;

    if config.order == ElementOrder::Descending {
        set.sort_descending();
    }

    tracing::info!(
        "Laying out {} elements ({:?}) in {:.0}x{:.0} area",
        set.len(),
        config.algorithm,
        bounds.width,
        bounds.height
    );

    match config.algorithm {
        Algorithm::SliceAndDice => SliceAndDiceLayout.layout(&set, bounds, config),
        Algorithm::Squarified => SquarifiedLayout.layout(&set, bounds, config),
    }
}

/// Independent input for [`compute_layouts`].
#[derive(Debug, Clone)]
pub struct LayoutJob<T> {
    pub elements: Vec<Element<T>>,
    pub bounds: Bounds,
}

/// Run many independent layouts in parallel. Results keep job order; one
/// job failing does not affect the others.
pub fn compute_layouts<T>(jobs: &[LayoutJob<T>], config: &LayoutConfig) -> Vec<Result<Vec<PlacedRect<T>>>>
where
    T: Clone + Send + Sync,
{
    jobs.par_iter()
        .map(|job| compute_layout(&job.elements, job.bounds, config))
        .collect()
}
