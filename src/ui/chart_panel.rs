use crate::processing::chart_spec::{BarKind, ChartSpec, LabelStyle};
use crate::render::chart_view::{self, ChartView};
use crate::state::theme::Theme;

/// Actions that the chart panel can request from the parent.
pub enum ChartAction {
    None,
    ExportImageSave,
    ExportImageClipboard,
    ExportSpecJson,
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Render the chart with its toolbar. `last_rect` receives the screen area
/// of the panel so a screenshot can be cropped to it.
pub fn show_chart_panel(
    spec: &ChartSpec,
    ui: &mut egui::Ui,
    theme: &Theme,
    panel_height: f32,
    last_rect: &mut Option<egui::Rect>,
) -> ChartAction {
    let mut action = ChartAction::None;

    let frame_resp = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&spec.title).heading());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    if toolbar_btn(ui, "Spec JSON").on_hover_text("Save the chart description as JSON").clicked() {
                        action = ChartAction::ExportSpecJson;
                    }
                    if toolbar_btn(ui, "Copy").on_hover_text("Copy the chart image to the clipboard").clicked() {
                        action = ChartAction::ExportImageClipboard;
                    }
                    if toolbar_btn(ui, "Save PNG").on_hover_text("Save the chart as a PNG image").clicked() {
                        action = ChartAction::ExportImageSave;
                    }
                });
            });
            ui.add_space(4.0);
            draw_chart(spec, ui, theme, panel_height);
        });

    *last_rect = Some(frame_resp.response.rect);
    action
}

fn draw_chart(spec: &ChartSpec, ui: &mut egui::Ui, theme: &Theme, plot_area_height: f32) {
    let left_margin = 70.0_f32;
    let right_margin = 20.0_f32;
    let bottom_margin = 48.0_f32;
    let top_margin = 10.0_f32;
    let plot_height = (plot_area_height - bottom_margin - top_margin).max(120.0);

    let total_height = plot_height + bottom_margin + top_margin;
    let available_width = ui.available_width();
    let total_rect = ui.allocate_space(egui::Vec2::new(available_width, total_height)).1;

    let plot_rect = egui::Rect::from_min_max(
        egui::Pos2::new(total_rect.left() + left_margin, total_rect.top() + top_margin),
        egui::Pos2::new(total_rect.right() - right_margin, total_rect.bottom() - bottom_margin),
    );

    let view = ChartView::fit(spec);
    let painter = ui.painter_at(total_rect);
    painter.rect_filled(plot_rect, 0.0, theme.plot_bg());

    // --- Dashed grid on y ticks ---
    let y_ticks = chart_view::y_ticks(view.y_min, view.y_max);
    let grid_stroke = egui::Stroke::new(1.0, theme.grid_color());
    for &yval in &y_ticks {
        let y = view.data_to_screen(view.x_min, yval, plot_rect).y;
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(plot_rect.left(), y), egui::pos2(plot_rect.right(), y)],
            grid_stroke,
            6.0,
            4.0,
        ));
    }

    // --- ±1σ band across the whole x range ---
    let band = &spec.std_dev_band;
    let band_rect = egui::Rect::from_two_pos(
        view.data_to_screen(band.x_min, band.y_max, plot_rect),
        view.data_to_screen(band.x_max, band.y_min, plot_rect),
    );
    painter.rect_filled(band_rect, 0.0, theme.band_fill());

    // --- Bars ---
    let half_width = 0.4 * view.x_scale(plot_rect);
    let edge = egui::Stroke::new(1.0, theme.bar_edge());
    for bar in &spec.bars {
        let x = bar.position as f64;
        let top = view.data_to_screen(x, bar.value, plot_rect);
        let base = view.data_to_screen(x, 0.0_f64.max(view.y_min), plot_rect);
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(top.x - half_width, top.y.min(base.y)),
            egui::pos2(top.x + half_width, top.y.max(base.y)),
        );
        painter.rect_filled(bar_rect, 0.0, theme.bar_fill(bar.kind));
        painter.rect_stroke(bar_rect, 0.0, edge, egui::StrokeKind::Inside);
    }

    // --- Mean reference line ---
    let mean_y = view.data_to_screen(view.x_min, spec.mean_line.value, plot_rect).y;
    painter.extend(egui::Shape::dashed_line(
        &[egui::pos2(plot_rect.left(), mean_y), egui::pos2(plot_rect.right(), mean_y)],
        egui::Stroke::new(1.5, theme.mean_line()),
        8.0,
        5.0,
    ));

    // --- Per-bar value labels ---
    let text_color = painter.ctx().style().visuals.text_color();
    for bar in &spec.bars {
        let anchor = view.data_to_screen(bar.position as f64, bar.value + spec.label_offset, plot_rect);
        paint_label(&painter, anchor, &bar.label, spec.bar_label_style, text_color, LabelAnchor::Bottom);
    }

    draw_axes(&painter, spec, &view, &y_ticks, plot_rect, total_rect);
    draw_legend(&painter, spec, theme, plot_rect);
}

enum LabelAnchor {
    /// Text sits above the anchor point.
    Bottom,
    /// Text hangs below the anchor point.
    Top,
}

/// Paint `text` centred on `anchor`, rotated counter-clockwise by the style's angle.
fn paint_label(
    painter: &egui::Painter,
    anchor: egui::Pos2,
    text: &str,
    style: LabelStyle,
    color: egui::Color32,
    placement: LabelAnchor,
) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(style.font_size + 2.0),
        color,
    );
    let size = galley.size();

    if style.rotation == 0.0 {
        let pos = match placement {
            LabelAnchor::Bottom => egui::pos2(anchor.x - size.x / 2.0, anchor.y - size.y),
            LabelAnchor::Top => egui::pos2(anchor.x - size.x / 2.0, anchor.y + 2.0),
        };
        painter.galley(pos, galley, color);
        return;
    }

    let angle = -style.rotation.to_radians();
    let pos = match placement {
        // Text grows up and to the right from the bar top.
        LabelAnchor::Bottom => egui::pos2(anchor.x - size.y / 2.0 * angle.sin().abs(), anchor.y - size.y / 2.0),
        // Text ends at the tick, rising to the right.
        LabelAnchor::Top => egui::pos2(
            anchor.x - size.x * angle.cos(),
            anchor.y + 2.0 + size.x * angle.sin().abs(),
        ),
    };
    painter.add(egui::Shape::Text(
        egui::epaint::TextShape::new(pos, galley, color).with_angle(angle),
    ));
}

fn draw_axes(
    painter: &egui::Painter,
    spec: &ChartSpec,
    view: &ChartView,
    y_ticks: &[f64],
    plot_rect: egui::Rect,
    total_rect: egui::Rect,
) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.7);
    let axis_stroke = egui::Stroke::new(1.0, dim_color);

    painter.line_segment([plot_rect.left_bottom(), plot_rect.right_bottom()], axis_stroke);
    painter.line_segment([plot_rect.left_bottom(), plot_rect.left_top()], axis_stroke);

    // --- X ticks: one per sample number ---
    for bar in &spec.bars {
        let x = view.data_to_screen(bar.position as f64, view.y_min, plot_rect).x;
        painter.line_segment(
            [egui::pos2(x, plot_rect.bottom()), egui::pos2(x, plot_rect.bottom() + 3.0)],
            axis_stroke,
        );
        paint_label(
            painter,
            egui::pos2(x, plot_rect.bottom() + 2.0),
            &bar.position.to_string(),
            spec.tick_style,
            dim_color,
            LabelAnchor::Top,
        );
    }

    painter.text(
        egui::Pos2::new(plot_rect.center().x, total_rect.bottom() - 2.0),
        egui::Align2::CENTER_BOTTOM,
        &spec.x_label,
        egui::FontId::proportional(12.0),
        text_color,
    );

    // --- Y ticks ---
    for &yval in y_ticks {
        let screen_y = view.data_to_screen(view.x_min, yval, plot_rect).y;
        if screen_y < plot_rect.top() || screen_y > plot_rect.bottom() {
            continue;
        }
        painter.text(
            egui::Pos2::new(plot_rect.left() - 4.0, screen_y),
            egui::Align2::RIGHT_CENTER,
            chart_view::format_tick_value(yval),
            egui::FontId::proportional(10.0),
            dim_color,
        );
    }

    let y_label = painter.layout_no_wrap(
        spec.y_label.clone(),
        egui::FontId::proportional(12.0),
        text_color,
    );
    let y_label_width = y_label.size().x;
    painter.add(egui::Shape::Text(
        egui::epaint::TextShape::new(
            egui::pos2(total_rect.left() + 2.0, plot_rect.center().y + y_label_width / 2.0),
            y_label,
            text_color,
        )
        .with_angle(-std::f32::consts::FRAC_PI_2),
    ));
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

fn draw_legend(painter: &egui::Painter, spec: &ChartSpec, theme: &Theme, plot_rect: egui::Rect) {
    let text_color = painter.ctx().style().visuals.text_color();
    let bg_color = painter.ctx().style().visuals.window_fill;
    let font = egui::FontId::proportional(11.0);

    let mut entries: Vec<(String, egui::Color32)> = vec![
        (spec.mean_line.label.clone(), theme.mean_line()),
        (spec.std_dev_band.label.clone(), theme.band_fill()),
        ("Replicate".to_string(), theme.bar_fill(BarKind::Normal)),
    ];
    if spec.outlier_positions().next().is_some() {
        entries.push(("Above mean + 2\u{03C3}".to_string(), theme.bar_fill(BarKind::Outlier)));
    }

    let max_width = entries
        .iter()
        .map(|(label, _)| {
            painter
                .layout_no_wrap(label.clone(), font.clone(), text_color)
                .rect
                .width()
        })
        .fold(0.0_f32, f32::max);

    let legend_width = max_width + 24.0; // color swatch + padding
    let legend_height = entries.len() as f32 * 16.0 + 8.0;
    let x = plot_rect.right() - 8.0;
    let mut y = plot_rect.top() + 8.0;

    let legend_rect = egui::Rect::from_min_size(
        egui::Pos2::new(x - legend_width - 4.0, y - 4.0),
        egui::Vec2::new(legend_width + 8.0, legend_height),
    );
    painter.rect_filled(legend_rect, 4.0, bg_color.gamma_multiply(0.85));
    painter.rect_stroke(legend_rect, 4.0, egui::Stroke::new(0.5, text_color.gamma_multiply(0.3)), egui::StrokeKind::Outside);

    for (label, color) in &entries {
        let swatch_rect = egui::Rect::from_min_size(
            egui::Pos2::new(x - legend_width, y),
            egui::Vec2::new(12.0, 12.0),
        );
        painter.rect_filled(swatch_rect, 2.0, *color);

        painter.text(
            egui::Pos2::new(x - legend_width + 16.0, y + 6.0),
            egui::Align2::LEFT_CENTER,
            label,
            font.clone(),
            text_color,
        );

        y += 16.0;
    }
}
