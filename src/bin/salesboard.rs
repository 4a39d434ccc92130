//! Salesboard Binary - Sales Dashboard Report
//!
//! Loads the sales CSV, applies the requested filters and emits the dashboard
//! aggregates as JSON on stdout.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin salesboard -- --country US --country FR --start 2024-01-01
//! cargo run --release --bin salesboard -- --defaults --backend sqlite --export-csv out/filtered_sales.csv
//! ```
//!
//! ## Environment Variables
//!
//! - SALES_DATA_PATH - Primary dataset (default: data/cleaned_sales.csv)
//! - SALES_SAMPLE_PATH - Fallback dataset (default: data/cleaned_sales_sample.csv)
//! - REPORT_OUTPUT_PATH - JSONL report directory (default: reports) - used with --backend jsonl
//! - SALESBOARD_DB_PATH - SQLite database path (default: data/salesboard.db) - used with --backend sqlite
//! - TOP_PRODUCTS_LIMIT - Products in the top-products table (default: 10)
//! - PREVIEW_ROWS - Rows in the preview table (default: 10)
//! - INVALID_DATE_POLICY - drop | reject (default: drop)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::NaiveDate;
use clap::Parser;
use salesboard::metrics_core::{
    build_report, export_csv_file, load_dataset, resolve_data_path, BackendType, DateRange,
    FilterOptions, OrderFilter, ReportWriter, WEEKDAYS,
};
use salesboard::DashboardConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "salesboard", about = "Sales dashboard aggregates from a CSV of orders")]
struct Args {
    /// Sales CSV to load (overrides SALES_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Keep only these countries (repeatable)
    #[arg(long = "country")]
    countries: Vec<String>,

    /// Keep only these categories (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Start from the dashboard's default filter instead of an empty one
    #[arg(long)]
    defaults: bool,

    /// Number of products in the top-products table
    #[arg(long)]
    top: Option<usize>,

    /// Number of rows in the preview table
    #[arg(long)]
    preview: Option<usize>,

    /// Persist the report: jsonl or sqlite
    #[arg(long, value_parser = parse_backend)]
    backend: Option<BackendType>,

    /// Write the filtered orders to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Do not print the report to stdout
    #[arg(long)]
    quiet: bool,
}

fn parse_backend(s: &str) -> Result<BackendType, String> {
    BackendType::parse(s).ok_or_else(|| format!("unknown backend '{}', expected jsonl or sqlite", s))
}

impl Args {
    fn filter(&self, options: &FilterOptions) -> OrderFilter {
        let mut filter = if self.defaults {
            OrderFilter::defaults(options)
        } else {
            OrderFilter::new()
        };

        if !self.countries.is_empty() {
            filter = filter.with_countries(self.countries.iter().cloned());
        }
        if !self.categories.is_empty() {
            filter = filter.with_categories(self.categories.iter().cloned());
        }
        if self.start.is_some() || self.end.is_some() {
            let base = filter.date_range.unwrap_or_default();
            filter = filter.with_date_range(DateRange {
                start: self.start.or(base.start),
                end: self.end.or(base.end),
            });
        }

        filter
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let args = Args::parse();
    let mut config = DashboardConfig::from_env()?;
    if let Some(ref data) = args.data {
        config.data_path = data.clone();
    }
    if let Some(top) = args.top {
        config.top_products = top;
    }
    if let Some(preview) = args.preview {
        config.preview_rows = preview;
    }

    log::info!("🚀 Starting Salesboard");
    log::info!("   Dataset: {}", config.data_path.display());
    log::info!("   Sample fallback: {}", config.sample_path.display());
    log::info!("   Invalid dates: {}", config.invalid_date_policy.as_str());

    let path = resolve_data_path(&config.data_path, &config.sample_path)?;
    let ingest = load_dataset(&path, config.invalid_date_policy)?;
    for dropped in ingest.dropped.iter().take(5) {
        log::warn!("   line {}: '{}'", dropped.line, dropped.value);
    }

    let dataset = ingest.dataset;
    let options = FilterOptions::from_dataset(&dataset);
    log::info!(
        "📊 {} orders, {} countries, {} categories",
        dataset.len(),
        options.countries.len(),
        options.categories.len()
    );

    let filter = args.filter(&options);
    let report = build_report(&dataset, &filter, config.report_options());

    log::info!("💰 Total revenue: {:.2}", report.kpis.total_revenue);
    log::info!("🧾 Orders: {}", report.kpis.total_orders);
    log::info!("📈 Avg order value: {:.2}", report.kpis.avg_order_value);
    log::info!("📦 Unique products: {}", report.kpis.unique_products);

    if let Some((weekday, hour, revenue)) = busiest_cell(&report.heatmap) {
        log::info!("🔥 Busiest slot: {} {:02}:00 ({:.2})", WEEKDAYS[weekday], hour, revenue);
    }

    if let Some(backend) = args.backend {
        let mut writer = ReportWriter::new(backend, config.report_target(backend))?;
        writer.write_report(&report)?;
        writer.flush()?;
        log::info!("✅ Report written ({})", writer.backend_type());
    }

    if let Some(ref export_path) = args.export_csv {
        let selection = filter.apply(&dataset);
        export_csv_file(&selection, export_path)?;
    }

    if !args.quiet {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn busiest_cell(heatmap: &salesboard::metrics_core::HourWeekdayHeatmap) -> Option<(usize, usize, f64)> {
    heatmap
        .rows()
        .iter()
        .enumerate()
        .flat_map(|(weekday, row)| row.iter().enumerate().map(move |(hour, revenue)| (weekday, hour, *revenue)))
        .filter(|(_, _, revenue)| *revenue > 0.0)
        .max_by(|a, b| a.2.total_cmp(&b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn options() -> FilterOptions {
        FilterOptions {
            countries: vec!["DE".to_string(), "FR".to_string(), "US".to_string(), "UK".to_string()],
            categories: vec!["Home".to_string()],
            first_date: Some(date("2024-01-01")),
            last_date: Some(date("2024-06-30")),
            default_countries: vec!["DE".to_string()],
        }
    }

    #[test]
    fn test_no_flags_is_unrestricted() {
        let args = Args::parse_from(["salesboard"]);
        assert!(args.filter(&options()).is_unrestricted());
    }

    #[test]
    fn test_defaults_with_start_override_keeps_default_end() {
        let args = Args::parse_from(["salesboard", "--defaults", "--start", "2024-03-01"]);
        let filter = args.filter(&options());

        assert_eq!(
            filter.date_range,
            Some(DateRange {
                start: Some(date("2024-03-01")),
                end: Some(date("2024-06-30")),
            })
        );
        assert_eq!(filter.countries.iter().collect::<Vec<_>>(), vec!["DE"]);
    }

    #[test]
    fn test_country_flags_replace_default_countries() {
        let args = Args::parse_from(["salesboard", "--defaults", "--country", "FR", "--country", "US"]);
        let filter = args.filter(&options());

        assert_eq!(filter.countries.iter().collect::<Vec<_>>(), vec!["FR", "US"]);
        assert_eq!(filter.date_range, Some(DateRange::between(date("2024-01-01"), date("2024-06-30"))));
    }

    #[test]
    fn test_end_without_defaults_leaves_start_open() {
        let args = Args::parse_from(["salesboard", "--end", "2024-02-15", "--category", "Home"]);
        let filter = args.filter(&options());

        assert_eq!(filter.date_range, Some(DateRange { start: None, end: Some(date("2024-02-15")) }));
        assert!(filter.countries.is_empty());
        assert_eq!(filter.categories.iter().collect::<Vec<_>>(), vec!["Home"]);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Args::try_parse_from(["salesboard", "--backend", "parquet"]).is_err());
    }
}
