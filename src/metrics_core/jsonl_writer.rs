//! JSONL writer for dashboard reports - one JSON object per line

use super::report::DashboardReport;
use super::writer_backend::ReportWriterBackend;
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORTS_FILE: &str = "reports.jsonl";

pub struct JsonlReportWriter {
    writer: BufWriter<File>,
    file_path: PathBuf,
    reports_written: usize,
}

impl JsonlReportWriter {
    /// Open `<output_dir>/reports.jsonl` for appending
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let file_path = output_dir.join(REPORTS_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        log::info!("📝 Writing reports to: {}", file_path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            file_path,
            reports_written: 0,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn reports_written(&self) -> usize {
        self.reports_written
    }
}

impl ReportWriterBackend for JsonlReportWriter {
    fn write_report(&mut self, report: &DashboardReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        writeln!(self.writer, "{}", json)?;
        self.reports_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}

impl Drop for JsonlReportWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
