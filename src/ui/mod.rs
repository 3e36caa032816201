pub mod chart_panel;
pub mod input_panel;
pub mod report_form;
pub mod results_panel;
pub mod settings_dialog;
