use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::data::error::ParseError;
use crate::data::loader::LoadedTable;
use crate::data::parser;
use crate::data::replicates::ReplicateSet;
use crate::processing::chart_spec::ChartSpec;
use crate::processing::report::{Message, ResultsRecord};
use crate::processing::statistics::{self, AnalysisError, AnalysisResult};
use crate::report::sink::{self, ReportError, ReportSink, DEFAULT_REPORT_PATH};
use crate::state::theme::Theme;

pub const VERSION: &str = "0.1.0";

/// Where the replicate weights come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Upload,
    Manual,
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Upload => "Upload a CSV or Excel file",
            InputMode::Manual => "Enter values manually",
        }
    }
}

/// User-adjustable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: Theme,
    /// File that receives report requests, one address per line.
    pub report_path: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

/// A completed analysis and everything derived from it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub record: ResultsRecord,
    pub chart: ChartSpec,
}

/// A tabular file that has been loaded, plus the column chosen from it.
#[derive(Debug, Clone)]
pub struct TableSource {
    pub file_name: String,
    pub table: LoadedTable,
    pub numeric_columns: Vec<String>,
    pub selected_column: Option<String>,
}

pub struct AppState {
    pub settings: AppSettings,
    pub input_mode: InputMode,
    pub manual_text: String,
    pub table: Option<TableSource>,
    pub analysis: Option<Analysis>,
    /// Messages about the current input: rejections, insufficient data, waiting.
    pub input_messages: Vec<Message>,
    pub email: String,
    pub report_message: Option<Message>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            settings: AppSettings::default(),
            input_mode: InputMode::Upload,
            manual_text: String::new(),
            table: None,
            analysis: None,
            input_messages: vec![waiting_message()],
            email: String::new(),
            report_message: None,
        }
    }

    /// Switch input mode, discarding the result computed from the other source.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode == mode {
            return;
        }
        self.input_mode = mode;
        match mode {
            InputMode::Manual => self.analyze_manual(),
            InputMode::Upload => self.analyze_selected_column(),
        }
    }

    /// Re-run the analysis on the manual entry text.
    pub fn analyze_manual(&mut self) {
        match parser::parse_manual(&self.manual_text) {
            Ok(replicates) => self.analyze(replicates),
            Err(ParseError::Empty) => self.reset(vec![waiting_message()]),
            Err(e) => {
                tracing::warn!("Manual entry rejected: {e}");
                self.reset(vec![Message::error(e.to_string())]);
            }
        }
    }

    /// Install a freshly loaded table with its first numeric column selected.
    ///
    /// The table is only analyzed while uploads are the active input; in manual
    /// mode it waits until the user switches back.
    pub fn set_table(&mut self, file_name: String, table: LoadedTable) {
        let numeric_columns: Vec<String> =
            table.numeric_columns().into_iter().map(str::to_string).collect();
        let selected_column = numeric_columns.first().cloned();
        self.table = Some(TableSource { file_name, table, numeric_columns, selected_column });
        if self.input_mode == InputMode::Upload {
            self.analyze_selected_column();
        } else {
            tracing::info!("Table loaded while in manual mode; analysis deferred");
        }
    }

    pub fn select_column(&mut self, column: &str) {
        if let Some(source) = self.table.as_mut() {
            source.selected_column = Some(column.to_string());
        }
        self.analyze_selected_column();
    }

    /// Re-run the analysis on the selected column of the loaded table.
    pub fn analyze_selected_column(&mut self) {
        let Some(source) = self.table.as_ref() else {
            self.reset(vec![waiting_message()]);
            return;
        };

        let parsed = match &source.selected_column {
            Some(column) => source.table.replicates(column),
            None => Err(ParseError::NoNumericColumn),
        };

        match parsed {
            Ok(replicates) => self.analyze(replicates),
            Err(e) => {
                tracing::warn!("Column rejected: {e}");
                self.reset(vec![Message::error(e.to_string())]);
            }
        }
    }

    /// Drop any previous table after a failed load. The failure replaces the
    /// current result only when uploads are the active input.
    pub fn load_failed(&mut self, error: &str) {
        self.table = None;
        if self.input_mode == InputMode::Upload {
            self.reset(vec![Message::error(format!("Error processing the file: {error}"))]);
        }
    }

    fn analyze(&mut self, replicates: ReplicateSet) {
        match statistics::analyze(&replicates) {
            Ok(result) => {
                tracing::info!(
                    "Analyzed {} replicates: mean {:.4}, CV {:.2}%, {} outlier(s)",
                    result.count,
                    result.mean,
                    result.coefficient_of_variation,
                    result.outliers.len()
                );
                let record = ResultsRecord::new(&result);
                let chart = ChartSpec::build(&replicates, &result);
                self.input_messages.clear();
                self.report_message = None;
                self.analysis = Some(Analysis { result, record, chart });
            }
            Err(e @ AnalysisError::InsufficientData { .. }) => {
                tracing::debug!("{e}");
                self.reset(vec![Message::warning(e.to_string())]);
            }
            Err(e @ AnalysisError::ZeroMean) => {
                tracing::warn!("{e}");
                self.reset(vec![Message::error(e.to_string())]);
            }
        }
    }

    fn reset(&mut self, messages: Vec<Message>) {
        self.analysis = None;
        self.report_message = None;
        self.input_messages = messages;
    }

    /// Send the entered address to `sink`. Never touches the current analysis.
    pub fn submit_report(&mut self, sink: &dyn ReportSink) {
        let message = match sink::submit_request(sink, &self.email) {
            Ok(address) => Message::success(format!(
                "Request sent. We will contact you at {}.",
                address.as_str()
            )),
            Err(e @ ReportError::InvalidAddress) => Message::error(e.to_string()),
            Err(e @ ReportError::Sink(_)) => {
                tracing::warn!("{e}");
                Message::warning(e.to_string())
            }
        };
        self.report_message = Some(message);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn waiting_message() -> Message {
    Message::info("Waiting for data to analyze.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv;
    use crate::processing::report::Severity;
    use crate::report::sink::MemoryReportSink;
    use std::io;

    fn manual(text: &str) -> AppState {
        let mut state = AppState::new();
        state.set_input_mode(InputMode::Manual);
        state.manual_text = text.to_string();
        state.analyze_manual();
        state
    }

    #[test]
    fn starts_waiting_for_data() {
        let state = AppState::new();
        assert!(state.analysis.is_none());
        assert_eq!(state.input_messages[0].severity, Severity::Info);
    }

    #[test]
    fn manual_entry_with_enough_values_is_analyzed() {
        let state = manual("10,10,10,10,10,10,10,10");
        let analysis = state.analysis.as_ref().unwrap();
        assert_eq!(analysis.record.estimated_weight_per_1000, "100.00 g");
        assert_eq!(analysis.chart.bars.len(), 8);
        assert!(state.input_messages.is_empty());
    }

    #[test]
    fn short_manual_entry_warns() {
        let state = manual("10.1, 9.9, , 10.05");
        assert!(state.analysis.is_none());
        assert_eq!(state.input_messages[0].severity, Severity::Warning);
    }

    #[test]
    fn bad_token_clears_previous_result() {
        let mut state = manual("10,10,10,10,10,10,10,10");
        state.manual_text = "10.1, abc".to_string();
        state.analyze_manual();
        assert!(state.analysis.is_none());
        assert_eq!(state.input_messages[0].severity, Severity::Error);
    }

    #[test]
    fn table_preselects_first_numeric_column() {
        let csv = "id,a,b\nx,1,10\ny,1,10\nz,1,10\nw,1,10\nv,1,10\nu,1,10\nt,1,10\ns,1,10\n";
        let mut state = AppState::new();
        state.set_table("weights.csv".to_string(), load_csv(csv.as_bytes()).unwrap());

        let source = state.table.as_ref().unwrap();
        assert_eq!(source.numeric_columns, vec!["a", "b"]);
        assert_eq!(source.selected_column.as_deref(), Some("a"));
        assert_eq!(state.analysis.as_ref().unwrap().result.mean, 1.0);

        state.select_column("b");
        assert_eq!(state.analysis.as_ref().unwrap().result.mean, 10.0);
    }

    #[test]
    fn late_table_does_not_replace_manual_result() {
        let mut state = manual("10,10,10,10,10,10,10,10");
        let csv = "w\n1\n1\n1\n1\n1\n1\n1\n1\n";
        state.set_table("late.csv".to_string(), load_csv(csv.as_bytes()).unwrap());

        assert_eq!(state.analysis.as_ref().unwrap().result.mean, 10.0);
        assert!(state.table.is_some());

        state.set_input_mode(InputMode::Upload);
        assert_eq!(state.analysis.as_ref().unwrap().result.mean, 1.0);
    }

    #[test]
    fn late_load_failure_keeps_manual_result() {
        let mut state = manual("10,10,10,10,10,10,10,10");
        state.load_failed("boom");

        assert!(state.analysis.is_some());
        assert!(state.input_messages.is_empty());
        assert!(state.table.is_none());
    }

    #[test]
    fn load_failure_in_upload_mode_is_shown() {
        let mut state = AppState::new();
        state.load_failed("boom");
        assert!(state.analysis.is_none());
        assert_eq!(state.input_messages[0].severity, Severity::Error);
    }

    #[test]
    fn table_without_numeric_columns_is_rejected() {
        let mut state = AppState::new();
        state.set_table("names.csv".to_string(), load_csv("a\nx\n".as_bytes()).unwrap());
        assert!(state.analysis.is_none());
        assert_eq!(
            state.input_messages[0].text,
            ParseError::NoNumericColumn.to_string()
        );
    }

    #[test]
    fn report_failure_keeps_the_analysis() {
        struct Broken;
        impl ReportSink for Broken {
            fn append(&self, _: &sink::ContactAddress) -> io::Result<()> {
                Err(io::Error::other("disk full"))
            }
        }

        let mut state = manual("10,10,10,10,10,10,10,50");
        state.email = "lab@seeds.org".to_string();
        state.submit_report(&Broken);

        assert!(state.analysis.is_some());
        assert_eq!(state.report_message.as_ref().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn report_success_is_acknowledged() {
        let sink = MemoryReportSink::default();
        let mut state = manual("10,10,10,10,10,10,10,10");
        state.email = "lab@seeds.org".to_string();
        state.submit_report(&sink);

        assert_eq!(sink.lines(), vec!["lab@seeds.org".to_string()]);
        assert_eq!(state.report_message.as_ref().unwrap().severity, Severity::Success);

        state.email = "nobody".to_string();
        state.submit_report(&sink);
        assert_eq!(sink.lines().len(), 1);
        assert_eq!(state.report_message.as_ref().unwrap().severity, Severity::Error);
    }
}
