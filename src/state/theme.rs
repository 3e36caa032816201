use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};
use crate::processing::chart_spec::BarKind;
use crate::processing::report::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 60),
            Theme::Light => Color32::from_rgba_premultiplied(180, 180, 180, 80),
        }
    }

    pub fn bar_fill(&self, kind: BarKind) -> Color32 {
        match kind {
            BarKind::Normal => Color32::from_rgb(135, 206, 235), // Sky blue
            BarKind::Outlier => Color32::from_rgb(220, 40, 40),
        }
    }

    pub fn bar_edge(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(200),
            Theme::Light => Color32::BLACK,
        }
    }

    pub fn mean_line(&self) -> Color32 {
        Color32::from_rgb(0, 160, 0)
    }

    /// Green at roughly 15% opacity.
    pub fn band_fill(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(0, 160, 0, 38)
    }

    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match (self, severity) {
            (_, Severity::Error) => Color32::from_rgb(220, 60, 60),
            (_, Severity::Warning) => Color32::from_rgb(220, 160, 30),
            (Theme::Dark, Severity::Success) => Color32::from_rgb(90, 200, 90),
            (Theme::Light, Severity::Success) => Color32::from_rgb(20, 130, 20),
            (Theme::Dark, Severity::Info) => Color32::from_rgb(120, 170, 230),
            (Theme::Light, Severity::Info) => Color32::from_rgb(30, 90, 180),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}
