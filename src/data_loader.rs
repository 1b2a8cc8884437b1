use crate::models::{AbTestRecord, PricePoint, SeriesPoint};
use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Loads the analytical inputs from flat CSV files. Malformed rows (wrong
/// types, missing required columns, broken invariants) fail here, before any
/// computation runs; extra columns in the files are ignored.
pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load A/B test records. Columns: experiment, variant, date, visitors,
    /// conversions, conversion_rate, revenue.
    pub fn load_ab_records(&self, path: &Path) -> Result<Vec<AbTestRecord>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open A/B test file {}", path.display()))?;

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize().enumerate() {
            let mut record: AbTestRecord = row
                .with_context(|| format!("bad A/B test row {} in {}", idx + 1, path.display()))?;
            ensure!(
                record.conversions <= record.visitors,
                "row {}: conversions {} exceed visitors {}",
                idx + 1,
                record.conversions,
                record.visitors
            );
            if record.visitors == 0 {
                record.conversion_rate = f64::NAN;
            }
            records.push(record);
        }

        info!("loaded {} A/B test records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load price points. Columns: product, price_multiplier, sales, demand.
    pub fn load_price_points(&self, path: &Path) -> Result<Vec<PricePoint>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open elasticity file {}", path.display()))?;

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize().enumerate() {
            let record: PricePoint = row
                .with_context(|| format!("bad price row {} in {}", idx + 1, path.display()))?;
            ensure!(
                record.price_multiplier > 0.0,
                "row {}: price multiplier {} is not positive",
                idx + 1,
                record.price_multiplier
            );
            records.push(record);
        }

        info!("loaded {} price points from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load raw sales rows and aggregate them into an ascending daily series,
    /// summing sales_amount per date. Columns: date, sales_amount.
    pub fn load_daily_sales(&self, path: &Path) -> Result<Vec<SeriesPoint>> {
        #[derive(Deserialize)]
        struct SalesRow {
            date: NaiveDate,
            sales_amount: f64,
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open sales file {}", path.display()))?;

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (idx, row) in reader.deserialize().enumerate() {
            let row: SalesRow = row
                .with_context(|| format!("bad sales row {} in {}", idx + 1, path.display()))?;
            *totals.entry(row.date).or_insert(0.0) += row.sales_amount;
        }

        let series: Vec<SeriesPoint> = totals
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect();
        info!("aggregated {} daily sales points from {}", series.len(), path.display());
        Ok(series)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}
