//! Record filtering by date range, country and category

use super::record::{Dataset, OrderRecord, Selection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive range of calendar days. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Filter state for one dashboard view.
///
/// Empty country or category sets place no restriction. A category filter
/// never matches records without a category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub date_range: Option<DateRange>,
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Filter the dashboard starts with (and resets to)
    pub fn defaults(options: &FilterOptions) -> Self {
        let date_range = match (options.first_date, options.last_date) {
            (Some(first), Some(last)) => Some(DateRange::between(first, last)),
            _ => None,
        };

        Self {
            date_range,
            countries: options.default_countries.iter().cloned().collect(),
            categories: BTreeSet::new(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.date_range.map_or(true, |r| r.start.is_none() && r.end.is_none())
            && self.countries.is_empty()
            && self.categories.is_empty()
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some(range) = self.date_range {
            if !range.contains(record.date()) {
                return false;
            }
        }

        if !self.countries.is_empty() && !self.countries.contains(&record.country) {
            return false;
        }

        if !self.categories.is_empty() {
            match record.category {
                Some(ref category) if self.categories.contains(category) => {}
                _ => return false,
            }
        }

        true
    }

    /// Select the matching records of a dataset, preserving load order
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Selection<'a> {
        dataset.records().iter().filter(|r| self.matches(r)).collect()
    }
}

/// Choices offered by the filter widgets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Every country when there are at most three, otherwise the first
    pub default_countries: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let countries: Vec<String> = dataset
            .records()
            .iter()
            .map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let categories: Vec<String> = dataset
            .records()
            .iter()
            .filter_map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let first_date = dataset.records().iter().map(|r| r.date()).min();
        let last_date = dataset.records().iter().map(|r| r.date()).max();

        let default_countries = if countries.len() <= 3 {
            countries.clone()
        } else {
            countries.iter().take(1).cloned().collect()
        };

        Self {
            countries,
            categories,
            first_date,
            last_date,
            default_countries,
        }
    }
}
