//! Normalized order records and the immutable dataset that owns them

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One normalized order row. Revenue is always populated after ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: NaiveDateTime,
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,
    pub country: String,
    pub quantity: u32,
    pub price: f64,
    pub revenue: f64,
}

impl OrderRecord {
    /// Calendar day of the order
    pub fn date(&self) -> NaiveDate {
        self.order_date.date()
    }

    /// Hour of day, 0-23
    pub fn hour(&self) -> usize {
        self.order_date.hour() as usize
    }

    /// Weekday index, Monday = 0 through Sunday = 6
    pub fn weekday_index(&self) -> usize {
        self.order_date.weekday().num_days_from_monday() as usize
    }

    pub fn year(&self) -> i32 {
        self.order_date.year()
    }

    pub fn month(&self) -> u32 {
        self.order_date.month()
    }
}

/// Read-only set of records loaded once per session.
///
/// There are no mutators: a dataset is built by the loader and then passed by
/// reference to filters and aggregations.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selection over every record, in load order
    pub fn all(&self) -> Selection<'_> {
        self.records.iter().collect()
    }
}

/// Ordered, borrowed subset of a dataset. Input to every aggregation.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    records: Vec<&'a OrderRecord>,
}

impl<'a> Selection<'a> {
    pub fn new(records: Vec<&'a OrderRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_revenue(&self) -> f64 {
        self.iter().map(|r| r.revenue).sum()
    }
}

impl<'a> FromIterator<&'a OrderRecord> for Selection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a OrderRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
