use crate::processing::report::{self, Message, Severity};
use crate::state::app_state::Analysis;
use crate::state::theme::Theme;

/// A coloured one-line status message.
pub fn show_message(ui: &mut egui::Ui, theme: &Theme, message: &Message) {
    let prefix = match message.severity {
        Severity::Info => "\u{2139}",
        Severity::Success => "\u{2714}",
        Severity::Warning => "\u{26A0}",
        Severity::Error => "\u{2716}",
    };
    ui.label(
        egui::RichText::new(format!("{prefix} {}", message.text))
            .color(theme.severity_color(message.severity)),
    );
}

pub fn show_results(ui: &mut egui::Ui, theme: &Theme, analysis: &Analysis) {
    let record = &analysis.record;
    ui.label(egui::RichText::new("Results").strong().size(16.0));
    ui.add_space(4.0);

    egui::Grid::new("results_grid")
        .num_columns(2)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            let rows = [
                ("Mean", &record.mean),
                ("Standard deviation", &record.std_dev),
                ("Coefficient of variation", &record.coefficient_of_variation),
                ("Estimated weight of 1000 seeds", &record.estimated_weight_per_1000),
            ];
            for (name, value) in rows {
                ui.label(name);
                ui.label(egui::RichText::new(value).strong().monospace());
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    for message in record.messages() {
        show_message(ui, theme, &message);
    }

    let flagged = report::flagged_samples(&analysis.result);
    if !flagged.is_empty() {
        ui.indent("flagged_samples", |ui| {
            for line in flagged {
                ui.label(
                    egui::RichText::new(line)
                        .monospace()
                        .color(theme.severity_color(Severity::Error)),
                );
            }
        });
    }
}
