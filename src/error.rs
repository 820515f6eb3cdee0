use thiserror::Error;

/// Reasons a layout call is rejected. Every variant is detected before any
/// geometry is computed, so a failed call never yields a partial layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("element {index} has invalid weight {weight} (weights must be positive and finite)")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("degenerate layout area {width}x{height}")]
    DegenerateArea { width: f64, height: f64 },

    #[error("layout area {width}x{height} is too large to compute with")]
    AreaTooLarge { width: f64, height: f64 },

    #[error("total weight overflows (sum of {count} weights is not finite)")]
    WeightOverflow { count: usize },

    #[error("slice ratio {0} is outside the open interval (0, 1)")]
    InvalidSliceRatio(f64),

    #[error("root fraction {0} is outside the interval (0, 1]")]
    InvalidFraction(f64),

    #[error("{count} elements exceeds the configured maximum of {max}")]
    TooManyElements { count: usize, max: usize },

    #[error("nesting exceeds the configured maximum depth of {max}")]
    TooDeep { max: u16 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
