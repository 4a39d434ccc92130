//! Revenue aggregations over a selection of orders
//!
//! Every function here is a pure reduction: same selection in, same table out.
//! Empty selections yield empty tables, a zero heatmap and zero KPIs.

use super::record::{OrderRecord, Selection};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const HOURS_PER_DAY: usize = 24;

/// Bounds of the preview row count
pub const PREVIEW_MIN_ROWS: usize = 1;
pub const PREVIEW_MAX_ROWS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRevenue {
    pub country: String,
    pub revenue: f64,
}

/// Calendar month, ordered chronologically and rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(record: &OrderRecord) -> Self {
        Self::new(record.year(), record.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: YearMonth,
    pub revenue: f64,
}

/// Revenue by weekday (rows, Monday first) and hour of day (columns)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourWeekdayHeatmap {
    cells: [[f64; HOURS_PER_DAY]; 7],
}

impl HourWeekdayHeatmap {
    pub fn zeroed() -> Self {
        Self {
            cells: [[0.0; HOURS_PER_DAY]; 7],
        }
    }

    /// Revenue for one cell; out-of-range coordinates read as zero
    pub fn get(&self, weekday: usize, hour: usize) -> f64 {
        self.cells
            .get(weekday)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn rows(&self) -> &[[f64; HOURS_PER_DAY]; 7] {
        &self.cells
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    fn add(&mut self, weekday: usize, hour: usize, revenue: f64) {
        self.cells[weekday][hour] += revenue;
    }
}

impl Default for HourWeekdayHeatmap {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Headline numbers for a selection
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    /// Distinct order ids
    pub total_orders: usize,
    /// `total_revenue / total_orders`, 0.0 without orders
    pub avg_order_value: f64,
    /// Distinct product ids
    pub unique_products: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub countries: usize,
}

/// Top `n` products by total revenue, highest first, ties by name ascending
pub fn top_products(selection: &Selection<'_>, n: usize) -> Vec<ProductRevenue> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in selection.iter() {
        *totals.entry(record.product_name.as_str()).or_insert(0.0) += record.revenue;
    }

    let mut ranked: Vec<ProductRevenue> = totals
        .into_iter()
        .map(|(name, revenue)| ProductRevenue {
            product_name: name.to_string(),
            revenue,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranked.truncate(n);
    ranked
}

/// Total revenue per country
pub fn revenue_by_country(selection: &Selection<'_>) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for record in selection.iter() {
        *totals.entry(record.country.clone()).or_insert(0.0) += record.revenue;
    }
    totals
}

/// Country totals as a bar-chart table, highest first, ties by country ascending
pub fn ranked_countries(totals: &HashMap<String, f64>) -> Vec<CountryRevenue> {
    let mut ranked: Vec<CountryRevenue> = totals
        .iter()
        .map(|(country, revenue)| CountryRevenue {
            country: country.clone(),
            revenue: *revenue,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranked
}

/// Revenue per calendar month in chronological order. Months without orders
/// are left out.
pub fn monthly_revenue(selection: &Selection<'_>) -> Vec<MonthlyRevenue> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in selection.iter() {
        *totals.entry(YearMonth::of(record)).or_insert(0.0) += record.revenue;
    }

    totals
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue { month, revenue })
        .collect()
}

pub fn hour_weekday_heatmap(selection: &Selection<'_>) -> HourWeekdayHeatmap {
    let mut heatmap = HourWeekdayHeatmap::zeroed();
    for record in selection.iter() {
        heatmap.add(record.weekday_index(), record.hour(), record.revenue);
    }
    heatmap
}

pub fn kpis(selection: &Selection<'_>) -> Kpis {
    let total_revenue = selection.total_revenue();
    let total_orders = selection
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_products = selection
        .iter()
        .map(|r| r.product_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let avg_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    Kpis {
        total_revenue,
        total_orders,
        avg_order_value,
        unique_products,
    }
}

pub fn dataset_summary(selection: &Selection<'_>) -> DatasetSummary {
    DatasetSummary {
        rows: selection.len(),
        start_date: selection.iter().map(|r| r.date()).min(),
        end_date: selection.iter().map(|r| r.date()).max(),
        countries: selection
            .iter()
            .map(|r| r.country.as_str())
            .collect::<HashSet<_>>()
            .len(),
    }
}

/// First rows of a selection; `rows` is clamped to the preview bounds
pub fn preview<'a>(selection: &Selection<'a>, rows: usize) -> Vec<&'a OrderRecord> {
    let rows = rows.clamp(PREVIEW_MIN_ROWS, PREVIEW_MAX_ROWS);
    selection.iter().take(rows).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics_core::record::tests::create_test_record;
    use crate::metrics_core::record::Dataset;

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            // Friday
            create_test_record("1", "2024-01-05 10:00:00", "Lamp", "US", 2, 10.0),
            // Saturday
            create_test_record("2", "2024-02-10 18:00:00", "Desk", "FR", 1, 5.0),
            // Monday
            create_test_record("3", "2024-01-01 00:30:00", "Chair", "US", 3, 5.0),
            create_test_record("3", "2024-01-01 00:30:00", "Desk", "US", 1, 10.0),
            // Sunday
            create_test_record("4", "2023-12-31 23:00:00", "Sofa", "DE", 1, 300.0),
        ])
    }

    #[test]
    fn test_two_row_example() {
        let dataset = Dataset::new(vec![
            create_test_record("1", "2024-01-05 00:00:00", "Lamp", "US", 2, 10.0),
            create_test_record("2", "2024-02-10 00:00:00", "Desk", "FR", 1, 5.0),
        ]);
        let all = dataset.all();

        let by_country = revenue_by_country(&all);
        assert_eq!(by_country.len(), 2);
        assert_eq!(by_country["US"], 20.0);
        assert_eq!(by_country["FR"], 5.0);

        let monthly = monthly_revenue(&all);
        let rendered: Vec<(String, f64)> = monthly.iter().map(|m| (m.month.to_string(), m.revenue)).collect();
        assert_eq!(
            rendered,
            vec![("2024-01".to_string(), 20.0), ("2024-02".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_top_products_ranking() {
        let dataset = sample_dataset();
        let top = top_products(&dataset.all(), 10);

        let names: Vec<&str> = top.iter().map(|p| p.product_name.as_str()).collect();
        // Lamp 20, Chair 15, Desk 15, Sofa 300
        assert_eq!(names, vec!["Sofa", "Lamp", "Chair", "Desk"]);
        assert_eq!(top[2].revenue, 15.0);
        assert_eq!(top[3].revenue, 15.0);

        for pair in top.windows(2) {
            assert!(
                pair[0].revenue > pair[1].revenue
                    || (pair[0].revenue == pair[1].revenue && pair[0].product_name < pair[1].product_name)
            );
        }
    }

    #[test]
    fn test_top_products_truncates() {
        let dataset = sample_dataset();
        assert_eq!(top_products(&dataset.all(), 2).len(), 2);
        assert!(top_products(&dataset.all(), 0).is_empty());
        assert_eq!(top_products(&dataset.all(), 50).len(), 4);
    }

    #[test]
    fn test_country_totals_conserve_revenue() {
        let dataset = sample_dataset();
        let all = dataset.all();
        let totals = revenue_by_country(&all);

        let sum: f64 = totals.values().sum();
        assert!((sum - all.total_revenue()).abs() < 1e-9);

        let ranked = ranked_countries(&totals);
        let countries: Vec<&str> = ranked.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(countries, vec!["DE", "US", "FR"]);
    }

    #[test]
    fn test_monthly_revenue_is_chronological() {
        let dataset = sample_dataset();
        let monthly = monthly_revenue(&dataset.all());

        let months: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
        // no 2024-03 and no gap filling
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
        assert_eq!(monthly[1].revenue, 45.0);

        for pair in monthly.windows(2) {
            assert!(pair[0].month < pair[1].month);
        }
    }

    #[test]
    fn test_heatmap_cells_and_total() {
        let dataset = sample_dataset();
        let all = dataset.all();
        let heatmap = hour_weekday_heatmap(&all);

        assert_eq!(heatmap.get(4, 10), 20.0);
        assert_eq!(heatmap.get(5, 18), 5.0);
        assert_eq!(heatmap.get(0, 0), 25.0);
        assert_eq!(heatmap.get(6, 23), 300.0);
        assert_eq!(heatmap.get(3, 12), 0.0);
        assert_eq!(heatmap.get(7, 0), 0.0);
        assert!((heatmap.total() - all.total_revenue()).abs() < 1e-9);
    }

    #[test]
    fn test_kpis() {
        let dataset = sample_dataset();
        let kpis = kpis(&dataset.all());

        assert_eq!(kpis.total_revenue, 350.0);
        assert_eq!(kpis.total_orders, 4);
        assert_eq!(kpis.avg_order_value, 87.5);
        assert_eq!(kpis.unique_products, 4);
    }

    #[test]
    fn test_empty_selection_is_not_an_error() {
        let dataset = Dataset::default();
        let empty = dataset.all();

        assert!(top_products(&empty, 10).is_empty());
        assert!(revenue_by_country(&empty).is_empty());
        assert!(monthly_revenue(&empty).is_empty());
        assert_eq!(hour_weekday_heatmap(&empty), HourWeekdayHeatmap::zeroed());
        assert_eq!(kpis(&empty), Kpis::default());
        assert_eq!(dataset_summary(&empty), DatasetSummary::default());
        assert!(preview(&empty, 10).is_empty());
    }

    #[test]
    fn test_dataset_summary() {
        let dataset = sample_dataset();
        let summary = dataset_summary(&dataset.all());

        assert_eq!(summary.rows, 5);
        assert_eq!(summary.start_date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(summary.end_date, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(summary.countries, 3);
    }

    #[test]
    fn test_preview_clamps_row_count() {
        let dataset = sample_dataset();
        let all = dataset.all();

        assert_eq!(preview(&all, 2).len(), 2);
        assert_eq!(preview(&all, 0).len(), 1);
        assert_eq!(preview(&all, 1000).len(), 5);
        assert_eq!(preview(&all, 2)[0].order_id, "1");
    }

    #[test]
    fn test_year_month_serializes_as_string() {
        let json = serde_json::to_string(&MonthlyRevenue {
            month: YearMonth::new(2024, 3),
            revenue: 1.5,
        })
        .unwrap();
        assert_eq!(json, r#"{"month":"2024-03","revenue":1.5}"#);
    }
}
