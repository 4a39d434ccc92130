//! Writer backend trait for dashboard reports
//!
//! Defines the interface for persisting reports to different backends.

use super::report::DashboardReport;
use crate::error::Result;

/// Backend trait for writing dashboard reports
pub trait ReportWriterBackend {
    /// Write a single report
    fn write_report(&mut self, report: &DashboardReport) -> Result<()>;

    /// Flush pending writes to storage
    fn flush(&mut self) -> Result<()>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
