use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub z_threshold: f64, // |z| above this flags a variant as significant
    pub window: usize,    // trailing window for the drift forecast anchor
    pub horizon: usize,   // days to project forward
    pub growth_rate: f64, // assumed organic daily growth for the drift strategy
    pub jitter_low: f64,
    pub jitter_high: f64,
}

impl AnalysisConfig {
    pub fn new(z_threshold: f64, window: usize, horizon: usize) -> Self {
        Self {
            z_threshold,
            window,
            horizon,
            ..Self::default()
        }
    }

    /// Disable the multiplicative jitter so the drift strategy is deterministic.
    pub fn without_jitter(mut self) -> Self {
        self.jitter_low = 1.0;
        self.jitter_high = 1.0;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            z_threshold: 1.96, // ~95% confidence
            window: 7,
            horizon: 7,
            growth_rate: 0.02,
            jitter_low: 0.95,
            jitter_high: 1.05,
        }
    }
}

/// One day of one variant of an A/B experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestRecord {
    pub experiment: String,
    pub variant: String,
    pub date: NaiveDate,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64, // percent; NaN when visitors == 0
    pub revenue: f64,
}

impl AbTestRecord {
    pub fn new(
        experiment: impl Into<String>,
        variant: impl Into<String>,
        date: NaiveDate,
        visitors: u64,
        conversions: u64,
        revenue: f64,
    ) -> Self {
        let conversion_rate = if visitors > 0 {
            conversions as f64 / visitors as f64 * 100.0
        } else {
            f64::NAN
        };
        Self {
            experiment: experiment.into(),
            variant: variant.into(),
            date,
            visitors,
            conversions,
            conversion_rate,
            revenue,
        }
    }
}

/// One raw price/demand observation for a product at a given price multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub product: String,
    pub price_multiplier: f64, // relative to the base price, > 0
    pub sales: f64,
    pub demand: f64, // sales / realized price
}

impl PricePoint {
    pub fn new(product: impl Into<String>, price_multiplier: f64, sales: f64, demand: f64) -> Self {
        Self {
            product: product.into(),
            price_multiplier,
            sales,
            demand,
        }
    }
}

/// One day of an aggregate time series (e.g. total sales amount).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSummary {
    pub variant: String,
    /// Mean of per-day conversion rates; None when no day has any visitors.
    pub mean_conversion: Option<f64>,
    /// Sample std of per-day conversion rates; None with fewer than two usable days.
    pub std_conversion: Option<f64>,
    pub total_visitors: u64,
    pub total_conversions: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantComparison {
    pub variant: String,
    pub baseline: String,
    pub std_error: Option<f64>,
    /// None when the standard error is zero or either side is undefined.
    pub z_score: Option<f64>,
    pub significant: bool,
    /// Relative lift over the baseline in percent; None when the baseline rate is zero.
    pub lift_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub experiment: String,
    /// Per-variant summaries in first-encountered order; the first is the baseline.
    pub variants: Vec<VariantSummary>,
    pub comparisons: Vec<VariantComparison>,
    pub best_variant: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price_multiplier: f64,
    pub mean_sales: f64,
    pub mean_demand: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticityReport {
    pub product: String,
    /// One row per distinct multiplier, ascending.
    pub levels: Vec<PriceLevel>,
    /// Point elasticity between each computable adjacent pair of levels.
    pub pair_elasticities: Vec<f64>,
    pub avg_elasticity: f64,
    pub elastic: bool,
    /// Multiplier of the level with the highest mean sales.
    pub optimal_multiplier: f64,
}

impl ElasticityReport {
    /// Pricing advice matching the sign and magnitude of the average elasticity.
    pub fn interpretation(&self) -> &'static str {
        if self.avg_elasticity < -1.0 {
            "elastic demand: a price cut should lift volume more than proportionally"
        } else if self.avg_elasticity < 0.0 {
            "inelastic demand: a moderate price increase should raise revenue"
        } else {
            "price has little measurable effect on demand"
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub projected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Observed points unchanged, followed by projected points in date order.
    pub points: Vec<ForecastPoint>,
}

impl ForecastReport {
    pub fn observed(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| !p.projected)
    }

    pub fn projected(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| p.projected)
    }
}
