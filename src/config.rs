//! Dashboard configuration from environment variables

use crate::error::{MetricsError, Result};
use crate::metrics_core::{BackendType, InvalidDatePolicy, ReportOptions};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration for the report runtime
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Primary sales CSV
    pub data_path: PathBuf,

    /// Bundled sample used when the primary file is absent
    pub sample_path: PathBuf,

    /// Directory for JSONL reports
    pub report_output_path: PathBuf,

    /// SQLite database for the sqlite backend
    pub db_path: PathBuf,

    pub top_products: usize,

    pub preview_rows: usize,

    pub invalid_date_policy: InvalidDatePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/cleaned_sales.csv"),
            sample_path: PathBuf::from("data/cleaned_sales_sample.csv"),
            report_output_path: PathBuf::from("reports"),
            db_path: PathBuf::from("data/salesboard.db"),
            top_products: 10,
            preview_rows: 10,
            invalid_date_policy: InvalidDatePolicy::Drop,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SALES_DATA_PATH` (default: data/cleaned_sales.csv)
    /// - `SALES_SAMPLE_PATH` (default: data/cleaned_sales_sample.csv)
    /// - `REPORT_OUTPUT_PATH` (default: reports)
    /// - `SALESBOARD_DB_PATH` (default: data/salesboard.db)
    /// - `TOP_PRODUCTS_LIMIT` (default: 10)
    /// - `PREVIEW_ROWS` (default: 10)
    /// - `INVALID_DATE_POLICY` (default: drop; drop | reject)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let invalid_date_policy = match lookup("INVALID_DATE_POLICY") {
            Some(value) => InvalidDatePolicy::parse(&value).ok_or_else(|| {
                MetricsError::Config(format!(
                    "INVALID_DATE_POLICY must be 'drop' or 'reject', got '{}'",
                    value
                ))
            })?,
            None => defaults.invalid_date_policy,
        };

        let parse_count = |key: &str, default: usize| match lookup(key) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    log::warn!("Invalid {} '{}', defaulting to {}", key, value, default);
                    default
                }
            },
            None => default,
        };

        Ok(Self {
            data_path: lookup("SALES_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            sample_path: lookup("SALES_SAMPLE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.sample_path),
            report_output_path: lookup("REPORT_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_output_path),
            db_path: lookup("SALESBOARD_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            top_products: parse_count("TOP_PRODUCTS_LIMIT", defaults.top_products),
            preview_rows: parse_count("PREVIEW_ROWS", defaults.preview_rows),
            invalid_date_policy,
        })
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_products: self.top_products,
            preview_rows: self.preview_rows,
        }
    }

    /// Output location for a report backend
    pub fn report_target(&self, backend: BackendType) -> &Path {
        match backend {
            BackendType::Jsonl => &self.report_output_path,
            BackendType::Sqlite => &self.db_path,
        }
    }
}
