use eframe::egui;
use crate::data::loader::{self, LoadedTable, SUPPORTED_EXTENSIONS};
use crate::report::sink::FileReportSink;
use crate::state::app_state::{AppState, InputMode, VERSION};
use crate::ui::chart_panel::{self, ChartAction};
use crate::ui::input_panel::{self, InputAction};
use crate::ui::report_form;
use crate::ui::results_panel;
use crate::ui::settings_dialog::SettingsDialogState;
use std::sync::{Arc, Mutex};

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// Pending async file load result.
struct PendingLoad {
    file_name: String,
    result: Arc<Mutex<Option<Result<LoadedTable, String>>>>,
}

/// The main SeedWeight application.
pub struct SeedWeightApp {
    pub state: AppState,
    /// Active settings dialog.
    pub settings_dialog: Option<SettingsDialogState>,
    /// Export failures, shown in the footer until dismissed.
    pub error_message: Option<String>,
    /// Whether to show the About window (hidden menu).
    pub show_about: bool,
    /// Receives report requests; rebuilt when the configured path changes.
    report_sink: FileReportSink,
    /// Async file load in progress.
    pending_load: Option<PendingLoad>,
    /// Pending screenshot action (save file or clipboard).
    pending_screenshot: Option<PendingScreenshot>,
    /// Screen area of the chart panel in the last frame, for cropping screenshots.
    chart_rect: Option<egui::Rect>,
}

impl SeedWeightApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(20.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);

        ctx.set_style(style);
        ctx.set_visuals(state.settings.theme.visuals());

        let report_sink = FileReportSink::new(state.settings.report_path.clone());

        Self {
            state,
            settings_dialog: None,
            error_message: None,
            show_about: false,
            report_sink,
            pending_load: None,
            pending_screenshot: None,
            chart_rect: None,
        }
    }

    /// Open a native file dialog and load the chosen table.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &SUPPORTED_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a data file on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &std::path::Path) {
        let path_buf = path.to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result: Arc<Mutex<Option<Result<LoadedTable, String>>>> =
            Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf).map_err(|e| e.to_string());
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad { file_name, result });
    }

    fn poll_pending_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = match pending.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err("file loader stopped unexpectedly".to_string())),
        };
        let Some(result) = finished else {
            return;
        };

        let file_name = pending.file_name.clone();
        self.pending_load = None;
        match result {
            Ok(table) => self.state.set_table(file_name, table),
            Err(e) => {
                tracing::error!("Failed to load file: {e}");
                if self.state.input_mode == InputMode::Manual {
                    self.error_message = Some(format!("Failed to load {file_name}: {e}"));
                }
                self.state.load_failed(&e);
            }
        }
    }

    fn submit_report(&mut self) {
        if self.report_sink.path() != self.state.settings.report_path {
            self.report_sink = FileReportSink::new(self.state.settings.report_path.clone());
        }
        self.state.submit_report(&self.report_sink);
    }

    /// Save the current chart description as JSON via a save dialog.
    fn export_chart_spec(&mut self) {
        let Some(analysis) = &self.state.analysis else {
            return;
        };
        let json = match analysis.chart.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize chart: {e}");
                self.error_message = Some(format!("Failed to serialize chart: {e}"));
                return;
            }
        };

        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("chart.json")
            .add_filter("JSON", &["json"])
            .save_file()
        {
            if let Err(e) = std::fs::write(&path, json) {
                tracing::error!("Failed to save chart description: {e}");
                self.error_message = Some(format!("Failed to save chart description: {e}"));
            } else {
                tracing::info!("Chart description saved to {:?}", path);
            }
        }
    }

    /// Crop the viewport screenshot to the chart panel and save or copy it.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() {
            return;
        }
        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });
        let Some(color_image) = screenshot_image else {
            return;
        };
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        let ppp = ctx.pixels_per_point();
        let full_w = color_image.width();
        let full_h = color_image.height();
        let (x0, y0, x1, y1) = match self.chart_rect {
            Some(rect) => (
                ((rect.left() * ppp) as usize).min(full_w),
                ((rect.top() * ppp) as usize).min(full_h),
                ((rect.right() * ppp).ceil() as usize).min(full_w),
                ((rect.bottom() * ppp).ceil() as usize).min(full_h),
            ),
            None => (0, 0, full_w, full_h),
        };
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for row in y0..y1 {
            for col in x0..x1 {
                let c = color_image.pixels[row * full_w + col];
                rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }

        match action {
            PendingScreenshot::SaveFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("seed_weights.png")
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    if let Some(img) = image::RgbaImage::from_raw(width as u32, height as u32, rgba) {
                        if let Err(e) = img.save(&path) {
                            self.error_message = Some(format!("Failed to save image: {e}"));
                        } else {
                            tracing::info!("Saved chart image to {:?}", path);
                        }
                    }
                }
            }
            PendingScreenshot::Clipboard => match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    let img_data = arboard::ImageData {
                        width,
                        height,
                        bytes: std::borrow::Cow::Owned(rgba),
                    };
                    if let Err(e) = clipboard.set_image(img_data) {
                        self.error_message = Some(format!("Failed to copy to clipboard: {e}"));
                    } else {
                        tracing::info!("Copied chart image to clipboard");
                    }
                }
                Err(e) => {
                    self.error_message = Some(format!("Failed to access clipboard: {e}"));
                }
            },
        }
    }
}

impl eframe::App for SeedWeightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.settings.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Screenshot requested in the previous frame
        // ------------------------------------------------------------------
        self.handle_screenshot(ctx);

        // ------------------------------------------------------------------
        // 1. Dropped files load like an upload
        // ------------------------------------------------------------------
        let mut dropped_path: Option<std::path::PathBuf> = None;
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    let ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_lowercase())
                        .unwrap_or_default();
                    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                        dropped_path = Some(path.clone());
                    }
                }
            }
        });
        if let Some(path) = dropped_path {
            self.state.set_input_mode(InputMode::Upload);
            self.load_file(&path);
        }

        // ------------------------------------------------------------------
        // 2. Poll async file load
        // ------------------------------------------------------------------
        self.poll_pending_load();
        if self.pending_load.is_some() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading file...");
                    });
                });
            ctx.request_repaint();
        }

        // ------------------------------------------------------------------
        // 3. Header
        // ------------------------------------------------------------------
        let mut open_settings = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let heading_response = ui.heading("Weight of 1000 Seeds");
                heading_response.context_menu(|ui| {
                    if ui.button("About SeedWeight").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        open_settings = true;
                    }
                    let theme_label = match self.state.settings.theme {
                        crate::state::theme::Theme::Dark => "Light Mode",
                        crate::state::theme::Theme::Light => "Dark Mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.state.settings.theme = self.state.settings.theme.toggle();
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
            ui.label(
                egui::RichText::new(
                    "Estimates the average weight of 1000 seeds from eight or more replicates of 100 seeds.",
                )
                .weak(),
            );
        });

        if open_settings && self.settings_dialog.is_none() {
            self.settings_dialog = Some(SettingsDialogState::new(&self.state.settings));
        }

        // ------------------------------------------------------------------
        // 4. Footer with transient errors
        // ------------------------------------------------------------------
        if self.error_message.is_some() {
            egui::TopBottomPanel::bottom("footer")
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
                .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(msg) = &self.error_message {
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });
        }

        // ------------------------------------------------------------------
        // 5. Input, results, chart and report form
        // ------------------------------------------------------------------
        let mut input_action = InputAction::None;
        let mut chart_action = ChartAction::None;
        let mut submit_report = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let viewport_height = ui.available_height();
            egui::ScrollArea::vertical().show(ui, |ui| {
                input_action = input_panel::show_input_panel(ui, &mut self.state);
                ui.separator();

                let theme = self.state.settings.theme;
                if let Some(analysis) = &self.state.analysis {
                    results_panel::show_results(ui, &theme, analysis);
                    ui.add_space(10.0);
                    chart_action = chart_panel::show_chart_panel(
                        &analysis.chart,
                        ui,
                        &theme,
                        (viewport_height * 0.6).max(360.0),
                        &mut self.chart_rect,
                    );
                    ui.add_space(10.0);
                    submit_report = report_form::show_report_form(ui, &mut self.state);
                }
            });
        });

        if let InputAction::OpenFile = input_action {
            self.open_file_dialog();
        }
        match chart_action {
            ChartAction::ExportImageSave => {
                self.pending_screenshot = Some(PendingScreenshot::SaveFile);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            ChartAction::ExportImageClipboard => {
                self.pending_screenshot = Some(PendingScreenshot::Clipboard);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            ChartAction::ExportSpecJson => self.export_chart_spec(),
            ChartAction::None => {}
        }
        if submit_report {
            self.submit_report();
        }

        // ------------------------------------------------------------------
        // 6. Settings dialog
        // ------------------------------------------------------------------
        let mut close_settings = false;
        if let Some(ref mut sd) = self.settings_dialog {
            close_settings =
                !crate::ui::settings_dialog::show_settings_dialog(ctx, sd, &mut self.state.settings);
        }
        if close_settings {
            self.settings_dialog = None;
        }

        // ------------------------------------------------------------------
        // 7. About window (hidden menu)
        // ------------------------------------------------------------------
        if self.show_about {
            egui::Window::new("About SeedWeight")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.heading("SeedWeight");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Weight of 1000 seeds from replicate weighings.");
                    ui.add_space(10.0);
                    ui.label("  \u{2022} CSV and Excel file support");
                    ui.label("  \u{2022} Coefficient of variation check");
                    ui.label("  \u{2022} Outlier marking (mean + 2 standard deviations)");
                    ui.label("  \u{2022} Chart export as PNG or JSON");
                    ui.add_space(10.0);
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
