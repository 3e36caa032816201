use crate::state::app_state::{AppState, InputMode};
use crate::ui::results_panel::show_message;

/// Actions that the input panel can request from the parent.
pub enum InputAction {
    None,
    OpenFile,
}

/// Input source selector plus the controls for the chosen source.
pub fn show_input_panel(ui: &mut egui::Ui, state: &mut AppState) -> InputAction {
    let mut action = InputAction::None;

    ui.label(egui::RichText::new("Choose how to enter the data:").strong());
    let mut mode = state.input_mode;
    ui.horizontal(|ui| {
        for m in [InputMode::Upload, InputMode::Manual] {
            ui.radio_value(&mut mode, m, m.label());
        }
    });
    state.set_input_mode(mode);

    ui.add_space(6.0);

    match state.input_mode {
        InputMode::Upload => {
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new("Choose file...").min_size(egui::vec2(0.0, 26.0)))
                    .on_hover_text("CSV or Excel file with a column of replicate weights")
                    .clicked()
                {
                    action = InputAction::OpenFile;
                }
                match &state.table {
                    Some(source) => ui.label(egui::RichText::new(format!(
                        "{} ({} rows)",
                        source.file_name, source.table.row_count
                    )).weak()),
                    None => ui.label(egui::RichText::new("or drop a file onto the window").weak()),
                };
            });

            let mut chosen: Option<String> = None;
            if let Some(source) = &state.table {
                if !source.numeric_columns.is_empty() {
                    ui.add_space(4.0);
                    ui.label("Select the column with the data:");
                    let current = source.selected_column.clone().unwrap_or_default();
                    egui::ComboBox::from_id_salt("column_selector")
                        .selected_text(&current)
                        .width(300.0)
                        .show_ui(ui, |ui| {
                            for name in &source.numeric_columns {
                                if ui.selectable_label(*name == current, name).clicked()
                                    && *name != current
                                {
                                    chosen = Some(name.clone());
                                }
                            }
                        });
                }
            }
            if let Some(column) = chosen {
                state.select_column(&column);
            }
        }
        InputMode::Manual => {
            ui.label("Enter the weights separated by commas (e.g. 10.1, 9.9, 10.05):");
            let response = ui.add(
                egui::TextEdit::multiline(&mut state.manual_text)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY)
                    .hint_text("10.1, 9.9, 10.05"),
            );
            if response.changed() {
                state.analyze_manual();
            }
        }
    }

    let theme = state.settings.theme;
    for message in &state.input_messages {
        show_message(ui, &theme, message);
    }

    action
}
