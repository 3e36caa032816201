use serde::Serialize;
use thiserror::Error;
use crate::data::replicates::ReplicateSet;

/// Fewest replicates for which the 1000-seed estimate is computed.
pub const MIN_REPLICATES: usize = 8;

/// CV (in percent) below which the sample is considered reliable.
pub const CV_THRESHOLD_PERCENT: f64 = 4.0;

/// Each replicate weighs 100 seeds, so the 1000-seed weight is ten replicate means.
pub const THOUSAND_SEED_SCALE: f64 = 10.0;

/// Number of standard deviations above the mean past which a replicate is flagged.
pub const OUTLIER_SIGMAS: f64 = 2.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("At least {required} values are needed to estimate the weight of 1000 seeds (got {actual}).")]
    InsufficientData { required: usize, actual: usize },

    #[error("The mean weight is zero; the coefficient of variation is undefined.")]
    ZeroMean,
}

/// A replicate above the outlier bound, with its 0-based position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outlier {
    pub index: usize,
    pub value: f64,
}

impl Outlier {
    /// 1-based sample number as shown on the chart.
    pub fn sample_number(&self) -> usize {
        self.index + 1
    }
}

/// Statistics derived from one replicate set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 divisor).
    pub std_dev: f64,
    /// `std_dev / mean * 100`.
    pub coefficient_of_variation: f64,
    pub estimated_weight_per_1000: f64,
    /// `mean + 2 * std_dev`; replicates strictly above it are outliers.
    pub upper_bound: f64,
    pub outliers: Vec<Outlier>,
    pub variance_acceptable: bool,
}

impl AnalysisResult {
    pub fn is_outlier(&self, index: usize) -> bool {
        self.outliers.iter().any(|o| o.index == index)
    }

    pub fn outlier_values(&self) -> Vec<f64> {
        self.outliers.iter().map(|o| o.value).collect()
    }
}

/// Compute the 1000-seed statistics for a replicate set.
pub fn analyze(replicates: &ReplicateSet) -> Result<AnalysisResult, AnalysisError> {
    analyze_values(replicates.values())
}

/// Same as [`analyze`] over a raw slice, which may be empty.
pub fn analyze_values(values: &[f64]) -> Result<AnalysisResult, AnalysisError> {
    let count = values.len();
    if count < MIN_REPLICATES {
        return Err(AnalysisError::InsufficientData {
            required: MIN_REPLICATES,
            actual: count,
        });
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return Err(AnalysisError::ZeroMean);
    }

    let sum_squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let std_dev = (sum_squares / (n - 1.0)).sqrt();
    let coefficient_of_variation = std_dev / mean * 100.0;
    let upper_bound = mean + OUTLIER_SIGMAS * std_dev;

    let outliers: Vec<Outlier> = values
        .iter()
        .enumerate()
        .filter(|(_, &v)| is_high_outlier(v, upper_bound))
        .map(|(index, &value)| Outlier { index, value })
        .collect();

    Ok(AnalysisResult {
        count,
        mean,
        std_dev,
        coefficient_of_variation,
        estimated_weight_per_1000: mean * THOUSAND_SEED_SCALE,
        upper_bound,
        outliers,
        variance_acceptable: coefficient_of_variation < CV_THRESHOLD_PERCENT,
    })
}

/// One-sided rule: only replicates heavier than the bound are flagged.
pub fn is_high_outlier(value: f64, upper_bound: f64) -> bool {
    value > upper_bound
}

/// Reliability verdict for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Acceptable,
    DoubleSampleCount,
}

impl Classification {
    pub fn of(result: &AnalysisResult) -> Self {
        if result.coefficient_of_variation < CV_THRESHOLD_PERCENT {
            Classification::Acceptable
        } else {
            Classification::DoubleSampleCount
        }
    }

    pub fn recommendation(&self) -> String {
        match self {
            Classification::Acceptable => "The coefficient of variation is acceptable.".to_string(),
            Classification::DoubleSampleCount => format!(
                "The coefficient of variation is {CV_THRESHOLD_PERCENT}% or higher. \
                 Doubling the number of samples is recommended."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(values: &[f64]) -> ReplicateSet {
        ReplicateSet::new(values.to_vec()).unwrap()
    }

    #[test]
    fn identical_replicates() {
        let result = analyze(&set(&[10.0; 8])).unwrap();
        assert_eq!(result.mean, 10.0);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.coefficient_of_variation, 0.0);
        assert_eq!(result.estimated_weight_per_1000, 100.0);
        assert!(result.variance_acceptable);
        assert!(result.outliers.is_empty());
        assert_eq!(Classification::of(&result), Classification::Acceptable);
    }

    #[test]
    fn one_heavy_replicate_is_flagged() {
        let result = analyze(&set(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 50.0])).unwrap();
        // mean 120 / 8; squared deviations 7 * 25 + 35^2 = 1400 over 7 degrees of freedom
        assert!((result.mean - 15.0).abs() < 1e-12);
        assert!((result.std_dev - 200f64.sqrt()).abs() < 1e-12);
        assert!((result.coefficient_of_variation - 94.28).abs() < 0.01);
        assert!((result.upper_bound - 43.28).abs() < 0.01);
        assert!(!result.variance_acceptable);
        assert_eq!(result.outliers, vec![Outlier { index: 7, value: 50.0 }]);
        assert_eq!(result.outliers[0].sample_number(), 8);
        assert_eq!(Classification::of(&result), Classification::DoubleSampleCount);
    }

    #[test]
    fn light_replicates_are_not_flagged() {
        let result = analyze(&set(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 0.5])).unwrap();
        assert!(result.outliers.is_empty());
    }

    #[test]
    fn outlier_bound_is_strict() {
        let values = [9.0, 11.0, 9.0, 11.0, 9.0, 11.0, 9.0, 11.0];
        let result = analyze(&set(&values)).unwrap();
        let bound = result.upper_bound;

        assert!(!is_high_outlier(bound, bound));
        assert!(is_high_outlier(f64::from_bits(bound.to_bits() + 1), bound));
        assert!(result.outliers.is_empty());
    }

    #[test]
    fn empty_sequence_is_insufficient() {
        assert_eq!(
            analyze_values(&[]),
            Err(AnalysisError::InsufficientData { required: MIN_REPLICATES, actual: 0 })
        );
    }

    #[test]
    fn zero_mean_is_rejected() {
        let values = [1.0, -1.0, 2.0, -2.0, 3.0, -3.0, 4.0, -4.0];
        assert_eq!(analyze(&set(&values)), Err(AnalysisError::ZeroMean));
    }

    #[test]
    fn cv_at_threshold_needs_more_samples() {
        let mut result = analyze(&set(&[10.0; 8])).unwrap();
        result.coefficient_of_variation = CV_THRESHOLD_PERCENT;
        assert_eq!(Classification::of(&result), Classification::DoubleSampleCount);
    }

    proptest! {
        #[test]
        fn fewer_than_eight_is_insufficient(values in prop::collection::vec(0.1f64..100.0, 1..MIN_REPLICATES)) {
            let actual = values.len();
            prop_assert_eq!(
                analyze(&set(&values)),
                Err(AnalysisError::InsufficientData { required: MIN_REPLICATES, actual })
            );
        }

        #[test]
        fn estimate_is_ten_means(values in prop::collection::vec(0.1f64..100.0, MIN_REPLICATES..64)) {
            let result = analyze(&set(&values)).unwrap();
            prop_assert!((result.estimated_weight_per_1000 - result.mean * 10.0).abs() < 1e-9);
            prop_assert_eq!(result.variance_acceptable, result.coefficient_of_variation < 4.0);
        }

        #[test]
        fn constant_sets_have_no_spread(v in 0.1f64..1000.0, n in MIN_REPLICATES..40usize) {
            let result = analyze(&set(&vec![v; n])).unwrap();
            prop_assert!(result.std_dev.abs() < 1e-9 * v);
            prop_assert!(result.coefficient_of_variation.abs() < 1e-6);
            prop_assert!((result.estimated_weight_per_1000 - v * 10.0).abs() < 1e-9 * v);
            prop_assert!(result.outliers.is_empty());
        }

        #[test]
        fn outliers_are_exactly_values_above_bound(values in prop::collection::vec(0.1f64..100.0, MIN_REPLICATES..64)) {
            let result = analyze(&set(&values)).unwrap();
            let expected: Vec<usize> = values
                .iter()
                .enumerate()
                .filter(|(_, &v)| v > result.upper_bound)
                .map(|(i, _)| i)
                .collect();
            let flagged: Vec<usize> = result.outliers.iter().map(|o| o.index).collect();
            prop_assert_eq!(flagged, expected);
        }
    }
}
