use serde::Serialize;
use crate::data::error::ParseError;

/// Ordered weights of 100-seed replicates, in the order they were entered.
///
/// Never empty and never holds a non-finite value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicateSet(Vec<f64>);

impl ReplicateSet {
    pub fn new(values: Vec<f64>) -> Result<Self, ParseError> {
        if values.is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ParseError::InvalidNumericToken(bad.to_string()));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs each weight with its 1-based sample number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate().map(|(i, v)| (i + 1, v))
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
