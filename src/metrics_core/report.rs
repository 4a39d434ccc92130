//! Dashboard report: every aggregation for one filter state

use super::aggregate::{
    dataset_summary, hour_weekday_heatmap, kpis, monthly_revenue, preview, ranked_countries,
    revenue_by_country, top_products, CountryRevenue, DatasetSummary, HourWeekdayHeatmap, Kpis,
    MonthlyRevenue, ProductRevenue,
};
use super::filter::OrderFilter;
use super::record::{Dataset, OrderRecord};
use serde::Serialize;

/// Knobs for building a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_products: usize,
    pub preview_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_products: 10,
            preview_rows: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: i64,
    pub filter: OrderFilter,
    pub kpis: Kpis,
    pub summary: DatasetSummary,
    pub top_products: Vec<ProductRevenue>,
    pub revenue_by_country: Vec<CountryRevenue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub heatmap: HourWeekdayHeatmap,
    pub preview: Vec<OrderRecord>,
}

/// Apply `filter` to `dataset` and run every aggregation over the result
pub fn build_report(dataset: &Dataset, filter: &OrderFilter, options: ReportOptions) -> DashboardReport {
    let selection = filter.apply(dataset);

    log::debug!(
        "Building report over {} of {} orders",
        selection.len(),
        dataset.len()
    );

    DashboardReport {
        generated_at: chrono::Utc::now().timestamp(),
        filter: filter.clone(),
        kpis: kpis(&selection),
        summary: dataset_summary(&selection),
        top_products: top_products(&selection, options.top_products),
        revenue_by_country: ranked_countries(&revenue_by_country(&selection)),
        monthly_revenue: monthly_revenue(&selection),
        heatmap: hour_weekday_heatmap(&selection),
        preview: preview(&selection, options.preview_rows)
            .into_iter()
            .cloned()
            .collect(),
    }
}
