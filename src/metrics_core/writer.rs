//! Unified writer interface for dashboard reports
//!
//! Routes writes to either the JSONL or the SQLite backend based on configuration.

use super::jsonl_writer::JsonlReportWriter;
use super::report::DashboardReport;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::ReportWriterBackend;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    #[default]
    Jsonl,
    Sqlite,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Jsonl => "jsonl",
            BackendType::Sqlite => "sqlite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jsonl" => Some(BackendType::Jsonl),
            "sqlite" => Some(BackendType::Sqlite),
            _ => None,
        }
    }
}

/// Unified writer that routes to either JSONL or SQLite backend
pub enum ReportWriter {
    Jsonl(JsonlReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    /// Create a writer for `backend`. `target` is the output directory for
    /// JSONL and the database file for SQLite.
    pub fn new(backend: BackendType, target: impl AsRef<Path>) -> Result<Self> {
        match backend {
            BackendType::Jsonl => Ok(ReportWriter::Jsonl(JsonlReportWriter::new(target)?)),
            BackendType::Sqlite => Ok(ReportWriter::Sqlite(SqliteReportWriter::new(target)?)),
        }
    }

    fn backend(&mut self) -> &mut dyn ReportWriterBackend {
        match self {
            ReportWriter::Jsonl(w) => w,
            ReportWriter::Sqlite(w) => w,
        }
    }

    pub fn write_report(&mut self, report: &DashboardReport) -> Result<()> {
        self.backend().write_report(report)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.backend().flush()
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Jsonl(w) => w.backend_type(),
            ReportWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
