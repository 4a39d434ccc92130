//! # salesboard
//!
//! Loads a CSV of sales orders and computes the aggregates behind a sales
//! dashboard: top products, revenue by country, the monthly revenue trend and
//! an hour × weekday revenue heatmap, plus headline KPIs.
//!
//! The dataset is loaded once and passed explicitly to every operation; no
//! state lives at module level. Callers (the `salesboard` binary, or any UI
//! layer) re-run [`metrics_core::build_report`] whenever the filter changes.
//!
//! ```no_run
//! use salesboard::metrics_core::{build_report, load_dataset, InvalidDatePolicy, OrderFilter, ReportOptions};
//!
//! let ingest = load_dataset("data/cleaned_sales_sample.csv", InvalidDatePolicy::Drop)?;
//! let filter = OrderFilter::new().with_countries(["US"]);
//! let report = build_report(&ingest.dataset, &filter, ReportOptions::default());
//! println!("{}", report.kpis.total_revenue);
//! # Ok::<(), salesboard::MetricsError>(())
//! ```

pub mod config;
pub mod error;
pub mod metrics_core;

pub use config::DashboardConfig;
pub use error::{MetricsError, Result};
