use crate::error::{LayoutError, Result};

use super::aggregate;

/// A caller-owned handle paired with the weight it should be laid out with.
///
/// The engine never inspects `id`; it is cloned into the output unchanged so
/// the caller can correlate placements with its own objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<T> {
    pub id: T,
    pub weight: f64,
}

impl<T> Element<T> {
    pub fn new(id: T, weight: f64) -> Self {
        Self { id, weight }
    }
}

/// Validated, ordered list of elements. Every weight is positive and finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet<T> {
    elements: Vec<Element<T>>,
}

impl<T> ElementSet<T> {
    /// Validate `elements`, rejecting the whole list if any weight is not
    /// strictly positive and finite, or if their sum overflows.
    pub fn new(elements: Vec<Element<T>>) -> Result<Self> {
        if let Some((index, element)) = elements
            .iter()
            .enumerate()
            .find(|(_, e)| !e.weight.is_finite() || e.weight <= 0.0)
        {
            return Err(LayoutError::InvalidWeight {
                index,
                weight: element.weight,
            });
        }
        if !aggregate::total_weight(&elements).is_finite() {
            return Err(LayoutError::WeightOverflow {
                count: elements.len(),
            });
        }
        Ok(Self { elements })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(id, weight)| Element::new(id, weight))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element<T>> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element<T>> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element<T>] {
        &self.elements
    }

    pub fn weights(&self) -> Vec<f64> {
        self.elements.iter().map(|e| e.weight).collect()
    }

    pub fn total_weight(&self) -> f64 {
        aggregate::total_weight(&self.elements)
    }

    /// Stable sort by weight, heaviest first. Equal weights keep input order.
    pub fn sort_descending(&mut self) {
        aggregate::sort_by_weight_desc(&mut self.elements);
    }

    pub fn into_vec(self) -> Vec<Element<T>> {
        self.elements
    }
}

impl<'a, T> IntoIterator for &'a ElementSet<T> {
    type Item = &'a Element<T>;
    type IntoIter = std::slice::Iter<'a, Element<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_weight_with_its_index() {
        let err = ElementSet::from_pairs([("a", 3.0), ("b", 0.0), ("c", 1.0)]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidWeight {
                index: 1,
                weight: 0.0
            }
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        assert!(ElementSet::from_pairs([("a", -1.0)]).is_err());
        assert!(ElementSet::from_pairs([("a", f64::NAN)]).is_err());
        assert!(ElementSet::from_pairs([("a", f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_weights_whose_sum_overflows() {
        let err = ElementSet::from_pairs([("a", 1e308), ("b", 1e308), ("c", 1e308)]).unwrap_err();
        assert_eq!(err, LayoutError::WeightOverflow { count: 3 });
        // large but summable
        assert!(ElementSet::from_pairs([("a", 1e307), ("b", 1e307)]).is_ok());
    }

    #[test]
    fn empty_input_is_valid() {
        let set = ElementSet::<u32>::new(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total_weight(), 0.0);
    }

    #[test]
    fn descending_sort_is_stable() {
        let mut set =
            ElementSet::from_pairs([("a", 1.0), ("b", 5.0), ("c", 1.0), ("d", 5.0)]).unwrap();
        set.sort_descending();
        let ids: Vec<&str> = set.iter().map(|e| e.id).collect();
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }
}
