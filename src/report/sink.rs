//! Report requests: contact addresses appended to a line-oriented list.
//!
//! The sink is a capability owned by the application shell. Analysis code
//! never touches it, and a failed append never invalidates a result that is
//! already on screen.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Default location of the request list, relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "report_requests.csv";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Please enter a valid email address.")]
    InvalidAddress,

    #[error("The address could not be saved: {0}")]
    Sink(#[from] io::Error),
}

/// An address that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAddress(String);

impl ContactAddress {
    /// Accepts any address containing both `@` and `.`, on a single line.
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        let address = raw.trim();
        let valid = address.contains('@')
            && address.contains('.')
            && !address.contains(['\n', '\r']);
        if valid {
            Ok(Self(address.to_string()))
        } else {
            Err(ReportError::InvalidAddress)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Durable, append-only list of report requests.
pub trait ReportSink {
    /// Append one address as one complete line.
    fn append(&self, address: &ContactAddress) -> io::Result<()>;
}

/// Validate `raw` and hand it to `sink`. The sink is not called for invalid input.
pub fn submit_request(sink: &dyn ReportSink, raw: &str) -> Result<ContactAddress, ReportError> {
    let address = ContactAddress::parse(raw)?;
    sink.append(&address)?;
    tracing::info!("Stored report request for {}", address.as_str());
    Ok(address)
}

/// Appends to a local file, one address per line.
///
/// Each line goes out in a single `write_all` while holding the lock, so
/// appends made through one sink never interleave.
pub struct FileReportSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReportSink {
    fn append(&self, address: &ContactAddress) -> io::Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| io::Error::other("report list lock poisoned"))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(format!("{}\n", address.as_str()).as_bytes())
    }
}

/// Keeps requests in memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryReportSink {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryReportSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl ReportSink for MemoryReportSink {
    fn append(&self, address: &ContactAddress) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("report list lock poisoned"))?
            .push(address.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn append(&self, _address: &ContactAddress) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[rstest]
    #[case("")]
    #[case("grower.example.com")]
    #[case("grower@example")]
    #[case("grower@exa\nmple.com")]
    fn invalid_addresses_never_reach_the_sink(#[case] raw: &str) {
        let sink = MemoryReportSink::default();
        let err = submit_request(&sink, raw).unwrap_err();
        assert!(matches!(err, ReportError::InvalidAddress));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn valid_address_is_trimmed_and_stored() {
        let sink = MemoryReportSink::default();
        let address = submit_request(&sink, "  lab@seeds.org ").unwrap();
        assert_eq!(address.as_str(), "lab@seeds.org");
        assert_eq!(sink.lines(), vec!["lab@seeds.org".to_string()]);
    }

    #[test]
    fn sink_failure_is_reported() {
        let err = submit_request(&FailingSink, "lab@seeds.org").unwrap_err();
        assert!(matches!(err, ReportError::Sink(_)));
    }

    #[test]
    fn file_sink_appends_one_line_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path().join("requests.csv"));

        submit_request(&sink, "a@b.c").unwrap();
        submit_request(&sink, "d@e.f").unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "a@b.c\nd@e.f\n");
    }

    #[test]
    fn file_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path().join("missing").join("requests.csv"));
        assert!(matches!(
            submit_request(&sink, "a@b.c"),
            Err(ReportError::Sink(_))
        ));
    }
}
