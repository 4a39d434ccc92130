//! CSV export of a filtered selection

use super::record::Selection;
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub const EXPORT_COLUMNS: [&str; 9] = [
    "order_id",
    "order_date",
    "product_id",
    "product_name",
    "category",
    "country",
    "quantity",
    "price",
    "revenue",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    order_id: &'a str,
    order_date: String,
    product_id: &'a str,
    product_name: &'a str,
    category: Option<&'a str>,
    country: &'a str,
    quantity: u32,
    price: f64,
    revenue: f64,
}

/// Write the selection as CSV with a header row. Returns the number of rows
/// written.
pub fn write_csv<W: Write>(selection: &Selection<'_>, writer: W) -> Result<usize> {
    // header is written even for an empty selection
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;
    let mut rows = 0usize;

    for record in selection.iter() {
        csv_writer.serialize(ExportRow {
            order_id: &record.order_id,
            order_date: record.order_date.format(DATE_FORMAT).to_string(),
            product_id: &record.product_id,
            product_name: &record.product_name,
            category: record.category.as_deref(),
            country: &record.country,
            quantity: record.quantity,
            price: record.price,
            revenue: record.revenue,
        })?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Export the selection to a file, creating parent directories
pub fn export_csv_file(selection: &Selection<'_>, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let rows = write_csv(selection, File::create(path)?)?;
    log::info!("📝 Exported {} rows to {}", rows, path.display());
    Ok(rows)
}
