use crate::state::app_state::AppState;
use crate::ui::results_panel::show_message;

/// Email form for requesting the report. Returns `true` when the user submits.
pub fn show_report_form(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut submitted = false;

    ui.label(egui::RichText::new("Request the report by email").strong().size(16.0));
    ui.add_space(4.0);

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.label("Enter your email address to request the report:");
            ui.horizontal(|ui| {
                let field = ui.add(
                    egui::TextEdit::singleline(&mut state.email)
                        .desired_width(280.0)
                        .hint_text("name@example.com"),
                );
                let enter = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let send = ui.add(egui::Button::new("Send request").min_size(egui::vec2(0.0, 26.0)));
                submitted = enter || send.clicked();
            });

            if let Some(message) = &state.report_message {
                show_message(ui, &state.settings.theme, message);
            }
        });

    submitted
}
