use std::path::PathBuf;
use crate::state::app_state::AppSettings;
use crate::state::theme::Theme;

/// Persistent state for the settings dialog while it is open.
pub struct SettingsDialogState {
    /// Report list path being edited; applied on "Apply".
    pub report_path: String,
    pub path_error: String,
}

impl SettingsDialogState {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            report_path: settings.report_path.display().to_string(),
            path_error: String::new(),
        }
    }
}

/// Show the settings dialog window. Returns `true` while it should stay open,
/// `false` when the user closes it.
pub fn show_settings_dialog(
    ctx: &egui::Context,
    state: &mut SettingsDialogState,
    settings: &mut AppSettings,
) -> bool {
    let mut open = true;
    let mut applied = false;

    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Appearance").strong().size(15.0));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for theme in [Theme::Dark, Theme::Light] {
                    ui.radio_value(&mut settings.theme, theme, theme.label());
                }
            });

            ui.add_space(12.0);

            ui.label(egui::RichText::new("Report requests").strong().size(15.0));
            ui.add_space(2.0);
            ui.label(egui::RichText::new("Addresses are appended to this file, one per line.").weak());
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut state.report_path).desired_width(320.0));
                if ui.button("Browse...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_file_name("report_requests.csv")
                        .add_filter("CSV Files", &["csv"])
                        .save_file()
                    {
                        state.report_path = path.display().to_string();
                    }
                }
            });

            if !state.path_error.is_empty() {
                ui.label(egui::RichText::new(&state.path_error).color(egui::Color32::from_rgb(220, 60, 60)));
            }

            ui.add_space(12.0);
            if ui.add(egui::Button::new("Apply").min_size(egui::vec2(80.0, 28.0))).clicked() {
                let trimmed = state.report_path.trim();
                if trimmed.is_empty() {
                    state.path_error = "The report file path cannot be empty.".to_string();
                } else {
                    settings.report_path = PathBuf::from(trimmed);
                    tracing::info!("Report requests will be stored in {:?}", settings.report_path);
                    applied = true;
                }
            }
        });

    open && !applied
}
