//! Declarative description of the replicate bar chart.
//!
//! A [`ChartSpec`] says what must be drawn (bars, the mean line, the ±1σ band
//! and the per-bar labels) without committing to a drawing backend. The egui
//! panel in `ui::chart_panel` is one consumer; the JSON export is another.

use serde::Serialize;
use crate::data::replicates::ReplicateSet;
use crate::processing::statistics::AnalysisResult;

/// Above this many replicates, labels shrink and rotate to stay legible.
pub const DENSE_CHART_THRESHOLD: usize = 20;

/// Label offset above each bar, as a fraction of the tallest replicate.
const LABEL_OFFSET_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarKind {
    Normal,
    Outlier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// 1-based sample number.
    pub position: usize,
    pub value: f64,
    pub kind: BarKind,
    pub label: String,
}

/// Font size (points) and rotation (degrees, counter-clockwise) for text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub font_size: f32,
    pub rotation: f32,
}

impl LabelStyle {
    /// Style of the value printed above each bar.
    pub fn for_bar_labels(count: usize) -> Self {
        if count <= DENSE_CHART_THRESHOLD {
            Self { font_size: 9.0, rotation: 0.0 }
        } else {
            Self { font_size: 7.0, rotation: 60.0 }
        }
    }

    /// Style of the sample numbers under the x axis.
    pub fn for_ticks(count: usize) -> Self {
        if count <= DENSE_CHART_THRESHOLD {
            Self { font_size: 10.0, rotation: 0.0 }
        } else {
            Self { font_size: 10.0, rotation: 45.0 }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

/// Horizontal band spanning `x_min..=x_max` and `y_min..=y_max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    pub mean_line: ReferenceLine,
    pub std_dev_band: Band,
    pub bar_label_style: LabelStyle,
    pub tick_style: LabelStyle,
    /// Vertical gap between a bar top and its label, in data units.
    pub label_offset: f64,
}

impl ChartSpec {
    pub fn build(replicates: &ReplicateSet, result: &AnalysisResult) -> Self {
        let count = replicates.len();

        let bars = replicates
            .numbered()
            .map(|(position, value)| Bar {
                position,
                value,
                kind: if result.is_outlier(position - 1) {
                    BarKind::Outlier
                } else {
                    BarKind::Normal
                },
                label: format!("{value:.2}"),
            })
            .collect();

        Self {
            title: "Replicate weights with out-of-range marking".to_string(),
            x_label: "Sample number".to_string(),
            y_label: "Weight (g)".to_string(),
            bars,
            mean_line: ReferenceLine {
                value: result.mean,
                label: format!("Mean = {:.2}", result.mean),
            },
            std_dev_band: Band {
                x_min: 0.0,
                x_max: (count + 1) as f64,
                y_min: result.mean - result.std_dev,
                y_max: result.mean + result.std_dev,
                label: "\u{00B1}1 standard deviation".to_string(),
            },
            bar_label_style: LabelStyle::for_bar_labels(count),
            tick_style: LabelStyle::for_ticks(count),
            label_offset: LABEL_OFFSET_FRACTION * replicates.max(),
        }
    }

    pub fn outlier_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.bars
            .iter()
            .filter(|b| b.kind == BarKind::Outlier)
            .map(|b| b.position)
    }

    /// Vertical extent covering every bar, label and the band, starting at zero.
    pub fn value_range(&self) -> (f64, f64) {
        let top = self
            .bars
            .iter()
            .map(|b| b.value + self.label_offset)
            .chain(std::iter::once(self.std_dev_band.y_max))
            .fold(f64::NEG_INFINITY, f64::max);
        let bottom = self
            .bars
            .iter()
            .map(|b| b.value)
            .chain(std::iter::once(self.std_dev_band.y_min))
            .fold(0.0, f64::min);
        (bottom, top)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::statistics::analyze;
    use proptest::prelude::*;
    use rstest::rstest;

    fn spec_for(values: &[f64]) -> (AnalysisResult, ChartSpec) {
        let set = ReplicateSet::new(values.to_vec()).unwrap();
        let result = analyze(&set).unwrap();
        let spec = ChartSpec::build(&set, &result);
        (result, spec)
    }

    #[test]
    fn heavy_replicate_bar_is_marked() {
        let (_, spec) = spec_for(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 50.0]);
        assert_eq!(spec.bars.len(), 8);
        assert_eq!(spec.outlier_positions().collect::<Vec<_>>(), vec![8]);
        assert_eq!(spec.bars[7].label, "50.00");
        assert_eq!(spec.mean_line.label, "Mean = 15.00");
        assert_eq!(spec.std_dev_band.x_min, 0.0);
        assert_eq!(spec.std_dev_band.x_max, 9.0);
        assert!((spec.label_offset - 0.5).abs() < 1e-12);
    }

    #[test]
    fn band_is_one_std_dev_around_mean() {
        let (result, spec) = spec_for(&[9.0, 11.0, 9.0, 11.0, 9.0, 11.0, 9.0, 11.0]);
        assert_eq!(spec.std_dev_band.y_min, result.mean - result.std_dev);
        assert_eq!(spec.std_dev_band.y_max, result.mean + result.std_dev);
        assert_eq!(spec.mean_line.value, result.mean);
    }

    #[rstest]
    #[case(8, 9.0, 0.0, 0.0)]
    #[case(20, 9.0, 0.0, 0.0)]
    #[case(21, 7.0, 60.0, 45.0)]
    #[case(60, 7.0, 60.0, 45.0)]
    fn text_policy_switches_above_twenty(
        #[case] count: usize,
        #[case] font_size: f32,
        #[case] rotation: f32,
        #[case] tick_rotation: f32,
    ) {
        let (_, spec) = spec_for(&vec![10.0; count]);
        assert_eq!(spec.bar_label_style.font_size, font_size);
        assert_eq!(spec.bar_label_style.rotation, rotation);
        assert_eq!(spec.tick_style.rotation, tick_rotation);
    }

    #[test]
    fn value_range_starts_at_zero() {
        let (_, spec) = spec_for(&[10.0; 8]);
        let (bottom, top) = spec.value_range();
        assert_eq!(bottom, 0.0);
        assert!((top - 10.1).abs() < 1e-12);
    }

    #[test]
    fn exports_json() {
        let (_, spec) = spec_for(&[10.0; 8]);
        let json = spec.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["bars"].as_array().map(Vec::len), Some(8));
        assert_eq!(parsed["bars"][0]["kind"], "Normal");
    }

    proptest! {
        #[test]
        fn bars_mirror_the_analysis(values in prop::collection::vec(0.1f64..100.0, 8..80)) {
            let (result, spec) = spec_for(&values);
            prop_assert_eq!(spec.bars.len(), values.len());
            prop_assert!(spec.bars.iter().all(|b| !b.label.is_empty()));
            prop_assert!(spec.bars.iter().enumerate().all(|(i, b)| b.position == i + 1));
            let flagged: Vec<usize> = spec.outlier_positions().collect();
            let reported: Vec<usize> = result.outliers.iter().map(|o| o.sample_number()).collect();
            prop_assert_eq!(flagged, reported);
        }
    }
}
