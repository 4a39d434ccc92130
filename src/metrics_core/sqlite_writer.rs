//! SQLite writer for dashboard reports
//!
//! Each report becomes one `reports` row plus one row per table entry in the
//! child tables, written in a single transaction.

use super::report::DashboardReport;
use super::writer_backend::ReportWriterBackend;
use crate::error::Result;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    generated_at INTEGER NOT NULL,
    filter TEXT NOT NULL,
    total_revenue REAL NOT NULL,
    total_orders INTEGER NOT NULL,
    avg_order_value REAL NOT NULL,
    unique_products INTEGER NOT NULL,
    row_count INTEGER NOT NULL,
    start_date TEXT,
    end_date TEXT,
    country_count INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS report_top_products (
    report_id INTEGER NOT NULL REFERENCES reports(id),
    rank INTEGER NOT NULL,
    product_name TEXT NOT NULL,
    revenue REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS report_country_revenue (
    report_id INTEGER NOT NULL REFERENCES reports(id),
    country TEXT NOT NULL,
    revenue REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS report_monthly_revenue (
    report_id INTEGER NOT NULL REFERENCES reports(id),
    month TEXT NOT NULL,
    revenue REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS report_heatmap (
    report_id INTEGER NOT NULL REFERENCES reports(id),
    weekday INTEGER NOT NULL,
    hour INTEGER NOT NULL,
    revenue REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reports_generated_at ON reports(generated_at DESC);
";

pub struct SqliteReportWriter {
    conn: Connection,
    last_report_id: Option<i64>,
}

impl SqliteReportWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(SCHEMA)?;

        log::info!("✅ SQLite report database initialized (journal_mode={})", journal_mode);

        Ok(Self {
            conn,
            last_report_id: None,
        })
    }

    /// Row id of the most recently written report
    pub fn last_report_id(&self) -> Option<i64> {
        self.last_report_id
    }
}

impl ReportWriterBackend for SqliteReportWriter {
    fn write_report(&mut self, report: &DashboardReport) -> Result<()> {
        let filter_json = serde_json::to_string(&report.filter)?;
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO reports
             (generated_at, filter, total_revenue, total_orders, avg_order_value,
              unique_products, row_count, start_date, end_date, country_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                report.generated_at,
                filter_json,
                report.kpis.total_revenue,
                report.kpis.total_orders as i64,
                report.kpis.avg_order_value,
                report.kpis.unique_products as i64,
                report.summary.rows as i64,
                report.summary.start_date.map(|d| d.to_string()),
                report.summary.end_date.map(|d| d.to_string()),
                report.summary.countries as i64,
            ],
        )?;
        let report_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO report_top_products (report_id, rank, product_name, revenue)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (rank, product) in report.top_products.iter().enumerate() {
                stmt.execute(params![report_id, rank as i64 + 1, product.product_name, product.revenue])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT INTO report_country_revenue (report_id, country, revenue) VALUES (?1, ?2, ?3)",
            )?;
            for country in &report.revenue_by_country {
                stmt.execute(params![report_id, country.country, country.revenue])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT INTO report_monthly_revenue (report_id, month, revenue) VALUES (?1, ?2, ?3)",
            )?;
            for point in &report.monthly_revenue {
                stmt.execute(params![report_id, point.month.to_string(), point.revenue])?;
            }

            // zero cells are implied
            let mut stmt = tx.prepare_cached(
                "INSERT INTO report_heatmap (report_id, weekday, hour, revenue) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (weekday, row) in report.heatmap.rows().iter().enumerate() {
                for (hour, revenue) in row.iter().enumerate() {
                    if *revenue != 0.0 {
                        stmt.execute(params![report_id, weekday as i64, hour as i64, revenue])?;
                    }
                }
            }
        }

        tx.commit()?;
        self.last_report_id = Some(report_id);

        log::debug!(
            "✅ Report {} written ({} products, {} countries, {} months)",
            report_id,
            report.top_products.len(),
            report.revenue_by_country.len(),
            report.monthly_revenue.len()
        );

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // every report is committed by write_report
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
