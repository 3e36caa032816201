use crate::processing::chart_spec::ChartSpec;

/// Data-space bounds of the bar chart and the mapping to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartView {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartView {
    /// Fit the view to a chart: the band's x-extent horizontally, every bar,
    /// label and the band vertically, with 5% headroom.
    pub fn fit(spec: &ChartSpec) -> Self {
        let (bottom, top) = spec.value_range();
        let y_pad = (top - bottom) * 0.05;
        let y_pad = if y_pad.abs() < 1e-15 { 0.5 } else { y_pad };

        Self {
            x_min: spec.std_dev_band.x_min,
            x_max: spec.std_dev_band.x_max,
            y_min: bottom,
            y_max: top + y_pad,
        }
    }

    /// Convert data coordinates to screen position.
    pub fn data_to_screen(&self, x: f64, y: f64, rect: egui::Rect) -> egui::Pos2 {
        let t_x = (x - self.x_min) / (self.x_max - self.x_min);
        let t_y = 1.0 - (y - self.y_min) / (self.y_max - self.y_min);
        egui::Pos2::new(
            rect.left() + (t_x as f32) * rect.width(),
            rect.top() + (t_y as f32) * rect.height(),
        )
    }

    /// Screen width of one x unit (one sample slot).
    pub fn x_scale(&self, rect: egui::Rect) -> f32 {
        rect.width() / (self.x_max - self.x_min) as f32
    }
}

/// Weight tick values on a 1-2-5 step, about six across `[min, max]`.
pub fn y_ticks(min: f64, max: f64) -> Vec<f64> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let raw_step = range / 6.0;
    let order = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * order)
        .find(|&s| s >= raw_step)
        .unwrap_or(10.0 * order);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Format a weight for the y-axis ticks.
pub fn format_tick_value(val: f64) -> String {
    if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.4}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::replicates::ReplicateSet;
    use crate::processing::statistics::analyze;

    #[test]
    fn view_pads_first_and_last_bar() {
        let set = ReplicateSet::new(vec![10.0; 8]).unwrap();
        let result = analyze(&set).unwrap();
        let view = ChartView::fit(&ChartSpec::build(&set, &result));
        assert_eq!(view.x_min, 0.0);
        assert_eq!(view.x_max, 9.0);
        assert_eq!(view.y_min, 0.0);
        assert!(view.y_max > 10.1);
    }

    #[test]
    fn maps_corners() {
        let view = ChartView { x_min: 0.0, x_max: 10.0, y_min: 0.0, y_max: 20.0 };
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 200.0));
        assert_eq!(view.data_to_screen(0.0, 0.0, rect), egui::pos2(0.0, 200.0));
        assert_eq!(view.data_to_screen(10.0, 20.0, rect), egui::pos2(100.0, 0.0));
        assert_eq!(view.x_scale(rect), 10.0);
    }

    #[test]
    fn ticks_step_through_weight_range() {
        assert_eq!(y_ticks(0.0, 12.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        assert_eq!(y_ticks(0.0, 55.0), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(y_ticks(5.0, 5.0).is_empty());
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(12.5), "12.5");
        assert_eq!(format_tick_value(10.0), "10");
    }
}
