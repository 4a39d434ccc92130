//! Metrics Core - Sales Aggregation Pipeline
//!
//! Turns a CSV of orders into the tables behind the sales dashboard.
//!
//! # Architecture
//!
//! ```text
//! CSV file (primary or bundled sample) → loader::ingest
//!     ↓
//! Dataset (immutable, passed by reference)
//!     ↓
//! OrderFilter (date range, countries, categories) → Selection
//!     ↓
//! aggregate (top products, country totals, monthly trend, heatmap, KPIs)
//!     ↓
//! DashboardReport → ReportWriter (JSONL or SQLite backend) / CSV export
//! ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod jsonl_writer;
pub mod loader;
pub mod record;
pub mod report;
pub mod sqlite_writer;
pub mod writer;
pub mod writer_backend;

pub use aggregate::{
    dataset_summary, hour_weekday_heatmap, kpis, monthly_revenue, preview, ranked_countries,
    revenue_by_country, top_products, CountryRevenue, DatasetSummary, HourWeekdayHeatmap, Kpis,
    MonthlyRevenue, ProductRevenue, YearMonth, WEEKDAYS,
};
pub use export::{export_csv_file, write_csv};
pub use filter::{DateRange, FilterOptions, OrderFilter};
pub use jsonl_writer::JsonlReportWriter;
pub use loader::{ingest, load_dataset, resolve_data_path, DroppedRow, IngestReport, InvalidDatePolicy};
pub use record::{Dataset, OrderRecord, Selection};
pub use report::{build_report, DashboardReport, ReportOptions};
pub use sqlite_writer::SqliteReportWriter;
pub use writer::{BackendType, ReportWriter};
pub use writer_backend::ReportWriterBackend;
