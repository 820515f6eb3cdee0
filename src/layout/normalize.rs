use crate::error::{LayoutError, Result};

use super::Bounds;

/// Rescale raw weights into areas that fill a `width` x `height` container.
///
/// Squarified packing assumes its inputs already sum to the container area;
/// slice-and-dice works on fractions instead and skips this step.
pub fn normalize(weights: &[f64], width: f64, height: f64) -> Result<Vec<f64>> {
    Bounds::new(width, height).validate()?;
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w <= 0.0)
    {
        return Err(LayoutError::InvalidWeight { index, weight });
    }
    if !weights.iter().sum::<f64>().is_finite() {
        return Err(LayoutError::WeightOverflow { count: weights.len() });
    }
    Ok(scale_to_area(weights, width * height))
}

/// Unchecked scaling used once inputs are known to be valid.
pub(crate) fn scale_to_area(weights: &[f64], area: f64) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    let multiplier = area / total;
    weights.iter().map(|w| w * multiplier).collect()
}
