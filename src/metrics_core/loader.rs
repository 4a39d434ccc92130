//! CSV ingest: header resolution, date parsing and revenue derivation

use super::record::{Dataset, OrderRecord};
use crate::error::{MetricsError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 5] = ["order_date", "product_name", "country", "quantity", "price"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// What to do with rows whose `order_date` cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidDatePolicy {
    /// Drop the row and report it in [`IngestReport::dropped`]
    #[default]
    Drop,
    /// Abort the whole load with [`MetricsError::InvalidDate`]
    Reject,
}

impl InvalidDatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidDatePolicy::Drop => "drop",
            InvalidDatePolicy::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Some(InvalidDatePolicy::Drop),
            "reject" => Some(InvalidDatePolicy::Reject),
            _ => None,
        }
    }
}

/// A row removed under [`InvalidDatePolicy::Drop`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub line: usize,
    pub value: String,
}

/// Ingest output: the dataset plus what was read and dropped
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub dataset: Dataset,
    pub rows_read: usize,
    pub dropped: Vec<DroppedRow>,
}

struct ColumnMap {
    order_id: Option<usize>,
    order_date: usize,
    product_id: Option<usize>,
    product_name: usize,
    category: Option<usize>,
    country: usize,
    quantity: usize,
    price: usize,
    revenue: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        // first occurrence wins for duplicated names
        let mut index: HashMap<String, usize> = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.trim().to_lowercase()).or_insert(i);
        }

        for column in REQUIRED_COLUMNS {
            if !index.contains_key(column) {
                return Err(MetricsError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        let optional = |name: &str| index.get(name).copied();
        // presence checked above
        let required = |name: &str| index.get(name).copied().unwrap_or_default();

        Ok(Self {
            order_id: optional("order_id"),
            order_date: required("order_date"),
            product_id: optional("product_id"),
            product_name: required("product_name"),
            category: optional("category"),
            country: required("country"),
            quantity: required("quantity"),
            price: required("price"),
            revenue: optional("revenue"),
        })
    }
}

/// Ingest orders from any CSV reader.
///
/// Revenue is taken from the `revenue` column when the column exists and the
/// cell is not empty; otherwise it is `quantity × price`.
pub fn ingest<R: Read>(reader: R, policy: InvalidDatePolicy) -> Result<IngestReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut dropped = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        rows_read += 1;
        let row = result?;
        let cell = |i: usize| row.get(i).unwrap_or("").trim();

        let raw_date = cell(columns.order_date);
        let order_date = match parse_order_date(raw_date) {
            Some(date) => date,
            None => match policy {
                InvalidDatePolicy::Reject => {
                    return Err(MetricsError::InvalidDate {
                        line,
                        value: raw_date.to_string(),
                    });
                }
                InvalidDatePolicy::Drop => {
                    log::debug!("Dropping line {}: unparseable order_date '{}'", line, raw_date);
                    dropped.push(DroppedRow {
                        line,
                        value: raw_date.to_string(),
                    });
                    continue;
                }
            },
        };

        let quantity = parse_quantity(cell(columns.quantity))
            .ok_or_else(|| invalid_number(line, "quantity", cell(columns.quantity)))?;
        let price = parse_amount(cell(columns.price))
            .ok_or_else(|| invalid_number(line, "price", cell(columns.price)))?;

        let revenue = match columns.revenue.map(cell).filter(|v| !is_null(v)) {
            Some(raw) => parse_amount(raw).ok_or_else(|| invalid_number(line, "revenue", raw))?,
            None => {
                let derived = quantity as f64 * price;
                if !derived.is_finite() {
                    return Err(invalid_number(line, "revenue", &derived.to_string()));
                }
                derived
            }
        };

        let product_name = cell(columns.product_name).to_string();
        let order_id = columns
            .order_id
            .map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{}", idx + 1));
        let product_id = columns
            .product_id
            .map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| product_name.clone());
        let category = columns
            .category
            .map(cell)
            .filter(|v| !is_null(v))
            .map(str::to_string);

        records.push(OrderRecord {
            order_id,
            order_date,
            product_id,
            product_name,
            category,
            country: cell(columns.country).to_string(),
            quantity,
            price,
            revenue,
        });
    }

    if !dropped.is_empty() {
        log::warn!(
            "⚠️  Dropped {} of {} rows with unparseable order_date",
            dropped.len(),
            rows_read
        );
    }

    Ok(IngestReport {
        dataset: Dataset::new(records),
        rows_read,
        dropped,
    })
}

/// Load and ingest a CSV file
pub fn load_dataset(path: impl AsRef<Path>, policy: InvalidDatePolicy) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = ingest(file, policy)?;

    log::info!(
        "📥 Loaded {} orders from {} (policy: {})",
        report.dataset.len(),
        path.display(),
        policy.as_str()
    );

    Ok(report)
}

/// Pick the primary dataset if present, otherwise the bundled sample
pub fn resolve_data_path(primary: &Path, sample: &Path) -> Result<PathBuf> {
    if primary.exists() {
        log::info!("Loading dataset from {}", primary.display());
        return Ok(primary.to_path_buf());
    }

    if sample.exists() {
        log::info!(
            "No dataset at {}, using sample at {}",
            primary.display(),
            sample.display()
        );
        return Ok(sample.to_path_buf());
    }

    Err(MetricsError::NoDataset {
        primary: primary.to_path_buf(),
        sample: sample.to_path_buf(),
    })
}

/// Parse an order timestamp. Date-only values land at midnight; values with a
/// UTC offset keep their local wall-clock time.
pub fn parse_order_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|dt| dt.naive_local())
}

fn parse_quantity(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().or_else(|| {
        // float-typed exports write "2.0"
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn is_null(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("null")
}

fn invalid_number(line: usize, column: &str, value: &str) -> MetricsError {
    MetricsError::InvalidNumber {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const NO_REVENUE_CSV: &str = "\
order_id,order_date,product_id,product_name,category,country,quantity,price
1,2024-01-05,P1,Lamp,Home,US,2,10
2,2024-02-10,P2,Desk,Office,FR,1,5
";

    #[test]
    fn test_ingest_derives_revenue() {
        let report = ingest(NO_REVENUE_CSV.as_bytes(), InvalidDatePolicy::Drop).unwrap();
        let records = report.dataset.records();

        assert_eq!(report.rows_read, 2);
        assert!(report.dropped.is_empty());
        assert_eq!(records[0].revenue, 20.0);
        assert_eq!(records[1].revenue, 5.0);
        assert_eq!(records[0].category.as_deref(), Some("Home"));
    }

    #[test]
    fn test_ingest_uses_revenue_column_and_fills_nulls() {
        let csv = "\
order_id,order_date,product_id,product_name,category,country,quantity,price,revenue
1,2024-01-05 09:15:00,P1,Lamp,Home,US,2,10,18.5
2,2024-01-06 10:00:00,P2,Desk,Office,FR,3,4,
3,2024-01-07 11:00:00,P3,Chair,Office,FR,1,7,NaN
";
        let report = ingest(csv.as_bytes(), InvalidDatePolicy::Drop).unwrap();
        let revenues: Vec<f64> = report.dataset.records().iter().map(|r| r.revenue).collect();

        assert_eq!(revenues, vec![18.5, 12.0, 7.0]);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "order_id,order_date,product_name,quantity,price\n1,2024-01-05,Lamp,1,2\n";
        let err = ingest(csv.as_bytes(), InvalidDatePolicy::Drop).unwrap_err();

        match err {
            MetricsError::MissingColumn { column } => assert_eq!(column, "country"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_headers_are_trimmed_and_case_insensitive() {
        let csv = " Order_Date , Product_Name,COUNTRY,Quantity, Price\n2024-03-01,Lamp,US,3,2.5\n";
        let report = ingest(csv.as_bytes(), InvalidDatePolicy::Drop).unwrap();
        let record = &report.dataset.records()[0];

        assert_eq!(record.revenue, 7.5);
        // optional columns fall back
        assert_eq!(record.order_id, "row-1");
        assert_eq!(record.product_id, "Lamp");
        assert_eq!(record.category, None);
    }

    #[test]
    fn test_drop_policy_reports_bad_dates() {
        let csv = "\
order_date,product_name,country,quantity,price
2024-01-05,Lamp,US,1,10
not-a-date,Desk,FR,1,5
,Chair,FR,1,5
2024-01-06,Sofa,DE,1,100
";
        let report = ingest(csv.as_bytes(), InvalidDatePolicy::Drop).unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(
            report.dropped,
            vec![
                DroppedRow { line: 3, value: "not-a-date".to_string() },
                DroppedRow { line: 4, value: String::new() },
            ]
        );
    }

    #[test]
    fn test_reject_policy_fails_on_first_bad_date() {
        let csv = "\
order_date,product_name,country,quantity,price
2024-01-05,Lamp,US,1,10
31/31/2024,Desk,FR,1,5
";
        let err = ingest(csv.as_bytes(), InvalidDatePolicy::Reject).unwrap_err();

        match err {
            MetricsError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "31/31/2024");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let csv = "order_date,product_name,country,quantity,price\n2024-01-05,Lamp,US,1,-3\n";
        let err = ingest(csv.as_bytes(), InvalidDatePolicy::Drop).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidNumber { line: 2, ref column, .. } if column == "price"));
    }

    #[test]
    fn test_overflowing_revenue_is_rejected() {
        let csv = "order_date,product_name,country,quantity,price\n2024-01-05,Lamp,US,10,1e308\n";
        let err = ingest(csv.as_bytes(), InvalidDatePolicy::Reject).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidNumber { line: 2, ref column, .. } if column == "revenue"));
    }

    #[test]
    fn test_missing_order_ids_do_not_collide() {
        let csv = "\
order_id,order_date,product_name,country,quantity,price
,2024-01-05,Lamp,US,1,10
2,2024-01-06,Desk,FR,1,5
1,2024-01-07,Sofa,DE,1,100
";
        let report = ingest(csv.as_bytes(), InvalidDatePolicy::Reject).unwrap();
        let ids: Vec<&str> = report.dataset.records().iter().map(|r| r.order_id.as_str()).collect();

        assert_eq!(ids, vec!["row-1", "2", "1"]);
        assert_eq!(crate::metrics_core::aggregate::kpis(&report.dataset.all()).total_orders, 3);
    }

    #[test]
    fn test_duplicate_header_keeps_first_column() {
        let csv = "order_date,product_name,country,quantity,price,price\n2024-01-05,Lamp,US,2,10,99\n";
        let report = ingest(csv.as_bytes(), InvalidDatePolicy::Reject).unwrap();
        let record = &report.dataset.records()[0];

        assert_eq!(record.price, 10.0);
        assert_eq!(record.revenue, 20.0);
    }

    #[test]
    fn test_float_quantity_accepted() {
        assert_eq!(parse_quantity("2.0"), Some(2));
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("-1"), None);
    }

    #[test]
    fn test_parse_order_date_formats() {
        let midnight = parse_order_date("2024-01-05").unwrap();
        assert_eq!(midnight.hour(), 0);

        let with_time = parse_order_date("2024-01-05 14:30:15").unwrap();
        assert_eq!(with_time.hour(), 14);

        let iso = parse_order_date("2024-01-05T08:05").unwrap();
        assert_eq!(iso.hour(), 8);

        let fractional = parse_order_date("2024-01-05 14:30:15.250").unwrap();
        assert_eq!(fractional.hour(), 14);

        let us = parse_order_date("01/05/2024 17:00").unwrap();
        assert_eq!(us.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        let offset = parse_order_date("2024-01-05T21:00:00+02:00").unwrap();
        assert_eq!(offset.hour(), 21);

        assert!(parse_order_date("yesterday").is_none());
        assert!(parse_order_date("").is_none());
    }

    #[test]
    fn test_invalid_date_policy_parse() {
        assert_eq!(InvalidDatePolicy::parse("DROP"), Some(InvalidDatePolicy::Drop));
        assert_eq!(InvalidDatePolicy::parse("reject"), Some(InvalidDatePolicy::Reject));
        assert_eq!(InvalidDatePolicy::parse("ignore"), None);
    }

    #[test]
    fn test_resolve_data_path_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("cleaned_sales.csv");
        let sample = dir.path().join("cleaned_sales_sample.csv");

        assert!(matches!(
            resolve_data_path(&primary, &sample),
            Err(MetricsError::NoDataset { .. })
        ));

        std::fs::write(&sample, NO_REVENUE_CSV).unwrap();
        assert_eq!(resolve_data_path(&primary, &sample).unwrap(), sample);

        std::fs::write(&primary, NO_REVENUE_CSV).unwrap();
        assert_eq!(resolve_data_path(&primary, &sample).unwrap(), primary);
    }

    #[test]
    fn test_load_dataset_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, NO_REVENUE_CSV).unwrap();

        let report = load_dataset(&path, InvalidDatePolicy::Reject).unwrap();
        assert_eq!(report.dataset.len(), 2);
    }
}
