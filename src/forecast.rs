use crate::models::{AnalysisConfig, ForecastPoint, ForecastReport, SeriesPoint};
use chrono::Duration;
use rand::Rng;

/// Ordinary-least-squares line over a series indexed by ordinal day.
#[derive(Debug, Clone, Copy)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, day_index: f64) -> f64 {
        self.slope * day_index + self.intercept
    }
}

/// Percent change between the last two points of a daily series.
/// None with fewer than two points or a zero previous value.
pub fn daily_growth(series: &[SeriesPoint]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let prev = series[series.len() - 2].value;
    let last = series[series.len() - 1].value;
    if prev == 0.0 {
        None
    } else {
        Some((last - prev) / prev * 100.0)
    }
}

pub struct TrendForecaster {
    config: AnalysisConfig,
}

impl TrendForecaster {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Fit value = slope * day_index + intercept over the observed points.
    /// None with fewer than two points or a degenerate index spread.
    pub fn fit_line(series: &[SeriesPoint]) -> Option<TrendLine> {
        if series.len() < 2 {
            return None;
        }
        let n = series.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        for (i, point) in series.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += point.value;
            sum_xy += x * point.value;
            sum_xx += x * x;
        }
        let denom = n * sum_xx - sum_x * sum_x;
        if denom == 0.0 {
            return None;
        }
        let slope = (n * sum_xy - sum_x * sum_y) / denom;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(TrendLine { slope, intercept })
    }

    /// Regression strategy: project the fitted line `horizon` days past the
    /// last observation. Deterministic. With fewer than two observed points
    /// or a zero horizon the observed series comes back with no projection.
    pub fn forecast(&self, series: &[SeriesPoint]) -> ForecastReport {
        let mut points = observed_points(series);
        if self.config.horizon == 0 {
            return ForecastReport { points };
        }
        let line = match Self::fit_line(series) {
            Some(line) => line,
            None => return ForecastReport { points },
        };

        let last_index = series.len() - 1;
        let last_date = series[last_index].date;
        for k in 1..=self.config.horizon {
            points.push(ForecastPoint {
                date: last_date + Duration::days(k as i64),
                value: line.value_at((last_index + k) as f64),
                projected: true,
            });
        }
        ForecastReport { points }
    }

    /// Moving-average-with-drift strategy: anchor on the trailing window
    /// average and grow it by `growth_rate` per day, scaled by a bounded
    /// multiplicative jitter drawn from the caller's RNG. Seed the RNG for
    /// reproducible output.
    pub fn forecast_drift<R: Rng>(&self, series: &[SeriesPoint], rng: &mut R) -> ForecastReport {
        let mut points = observed_points(series);
        if self.config.horizon == 0 || series.len() < 2 {
            return ForecastReport { points };
        }

        let window = self.config.window.clamp(1, series.len());
        let anchor = series[series.len() - window..]
            .iter()
            .map(|p| p.value)
            .sum::<f64>()
            / window as f64;

        let last_date = series[series.len() - 1].date;
        for k in 1..=self.config.horizon {
            let jitter = if self.config.jitter_low < self.config.jitter_high {
                rng.gen_range(self.config.jitter_low..=self.config.jitter_high)
            } else {
                self.config.jitter_low
            };
            points.push(ForecastPoint {
                date: last_date + Duration::days(k as i64),
                value: anchor * (1.0 + self.config.growth_rate * k as f64) * jitter,
                projected: true,
            });
        }
        ForecastReport { points }
    }
}

fn observed_points(series: &[SeriesPoint]) -> Vec<ForecastPoint> {
    series
        .iter()
        .map(|p| ForecastPoint {
            date: p.date,
            value: p.value,
            projected: false,
        })
        .collect()
}
