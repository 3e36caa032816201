use serde::Serialize;
use crate::processing::statistics::{AnalysisResult, Classification};

/// How a message is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { severity, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }
}

/// Display-ready figures for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsRecord {
    pub mean: String,
    pub std_dev: String,
    pub coefficient_of_variation: String,
    pub estimated_weight_per_1000: String,
    pub variance_acceptable: bool,
    pub recommendation: String,
    /// Raw, unrounded outlier weights.
    pub outliers: Vec<f64>,
}

impl ResultsRecord {
    pub fn new(result: &AnalysisResult) -> Self {
        Self {
            mean: format!("{:.2} g", result.mean),
            std_dev: format!("{:.4} g", result.std_dev),
            coefficient_of_variation: format!("{:.2}%", result.coefficient_of_variation),
            estimated_weight_per_1000: format!("{:.2} g", result.estimated_weight_per_1000),
            variance_acceptable: result.variance_acceptable,
            recommendation: Classification::of(result).recommendation(),
            outliers: result.outlier_values(),
        }
    }

    /// The classification and outlier messages, in display order.
    pub fn messages(&self) -> Vec<Message> {
        let verdict = if self.variance_acceptable {
            Message::success(&self.recommendation)
        } else {
            Message::warning(&self.recommendation)
        };

        let outliers = if self.outliers.is_empty() {
            Message::success("No replicate exceeds the mean + 2 standard deviations.")
        } else {
            Message::error(format!(
                "Replicates above the mean + 2 standard deviations: {:?}",
                self.outliers
            ))
        };

        vec![verdict, outliers]
    }
}

/// One line per flagged replicate, numbered the way the chart numbers bars.
pub fn flagged_samples(result: &AnalysisResult) -> Vec<String> {
    result
        .outliers
        .iter()
        .map(|o| format!("Sample {}: {} g", o.sample_number(), o.value))
        .collect()
}
