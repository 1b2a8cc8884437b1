use crate::models::{ElasticityReport, PriceLevel, PricePoint};

/// Product names in first-encountered order.
pub fn product_names(records: &[PricePoint]) -> Vec<String> {
    let mut names = Vec::new();
    for record in records {
        if !names.iter().any(|n| n == &record.product) {
            names.push(record.product.clone());
        }
    }
    names
}

pub struct ElasticityEstimator;

impl ElasticityEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate price elasticity of demand for one product from its price
    /// points. Returns None when no record carries the product name.
    pub fn estimate(&self, records: &[PricePoint], product: &str) -> Option<ElasticityReport> {
        let mut observations: Vec<&PricePoint> =
            records.iter().filter(|p| p.product == product).collect();
        if observations.is_empty() {
            return None;
        }
        observations.sort_by(|a, b| a.price_multiplier.total_cmp(&b.price_multiplier));

        let levels = Self::group_levels(&observations);
        let pair_elasticities = Self::pair_elasticities(&levels);

        let avg_elasticity = if pair_elasticities.is_empty() {
            0.0
        } else {
            pair_elasticities.iter().sum::<f64>() / pair_elasticities.len() as f64
        };

        Some(ElasticityReport {
            product: product.to_string(),
            optimal_multiplier: Self::optimal_multiplier(&levels),
            levels,
            avg_elasticity,
            elastic: avg_elasticity.abs() > 1.0,
            pair_elasticities,
        })
    }

    /// Average sales and demand per distinct multiplier, ascending.
    fn group_levels(sorted: &[&PricePoint]) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();

        for point in sorted {
            match levels.last_mut() {
                Some(level) if level.price_multiplier == point.price_multiplier => {
                    level.mean_sales += point.sales;
                    level.mean_demand += point.demand;
                    *counts.last_mut().unwrap() += 1;
                }
                _ => {
                    levels.push(PriceLevel {
                        price_multiplier: point.price_multiplier,
                        mean_sales: point.sales,
                        mean_demand: point.demand,
                    });
                    counts.push(1);
                }
            }
        }

        for (level, count) in levels.iter_mut().zip(&counts) {
            level.mean_sales /= *count as f64;
            level.mean_demand /= *count as f64;
        }
        levels
    }

    /// Point elasticity between adjacent levels: relative demand change over
    /// relative price change. Pairs with a zero price-change denominator or
    /// zero prior demand are skipped rather than failing the estimate; the
    /// sign is kept so falling demand reads negative.
    fn pair_elasticities(levels: &[PriceLevel]) -> Vec<f64> {
        let mut elasticities = Vec::new();
        for pair in levels.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let price_change = (curr.price_multiplier - prev.price_multiplier) / prev.price_multiplier;
            if price_change == 0.0 || prev.mean_demand == 0.0 {
                continue;
            }
            let demand_change = (curr.mean_demand - prev.mean_demand) / prev.mean_demand;
            elasticities.push(demand_change / price_change);
        }
        elasticities
    }

    fn optimal_multiplier(levels: &[PriceLevel]) -> f64 {
        let mut best = &levels[0];
        for level in &levels[1..] {
            // Strict comparison keeps the lowest multiplier on ties.
            if level.mean_sales > best.mean_sales {
                best = level;
            }
        }
        best.price_multiplier
    }
}

impl Default for ElasticityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(multiplier: f64, sales: f64, demand: f64) -> PricePoint {
        PricePoint::new("Widget", multiplier, sales, demand)
    }

    #[test]
    fn missing_product_yields_none() {
        let records = vec![widget(1.0, 100.0, 100.0)];
        assert!(ElasticityEstimator::new().estimate(&records, "Gadget").is_none());
    }

    #[test]
    fn single_multiplier_has_no_pairs_and_zero_average() {
        let records = vec![widget(1.0, 100.0, 100.0), widget(1.0, 120.0, 120.0)];
        let report = ElasticityEstimator::new().estimate(&records, "Widget").unwrap();
        assert!(report.pair_elasticities.is_empty());
        assert_eq!(report.avg_elasticity, 0.0);
        assert!(!report.elastic);
        assert_eq!(report.levels.len(), 1);
        assert_eq!(report.levels[0].mean_sales, 110.0);
    }

    #[test]
    fn widget_scenario_is_elastic_with_negative_average() {
        // Demand falls 120 -> 100 -> 80 as the multiplier rises 0.9 -> 1.0 -> 1.1.
        let records = vec![
            widget(1.1, 8800.0, 80.0),
            widget(0.9, 10800.0, 120.0),
            widget(1.0, 10000.0, 100.0),
        ];
        let report = ElasticityEstimator::new().estimate(&records, "Widget").unwrap();

        assert_eq!(report.pair_elasticities.len(), 2);
        assert!(report.avg_elasticity < 0.0);
        assert!(report.avg_elasticity.abs() > 1.0);
        assert!(report.elastic);
        // (-0.1667/0.1111 + -0.2/0.1) / 2
        assert!((report.avg_elasticity - (-1.75)).abs() < 1e-9);
        // Max mean sales sits at the 0.9 multiplier.
        assert_eq!(report.optimal_multiplier, 0.9);
    }

    #[test]
    fn duplicate_multiplier_observations_are_averaged() {
        let records = vec![
            widget(0.9, 100.0, 111.0),
            widget(0.9, 200.0, 223.0),
            widget(1.1, 150.0, 136.0),
        ];
        let report = ElasticityEstimator::new().estimate(&records, "Widget").unwrap();
        assert_eq!(report.levels.len(), 2);
        assert_eq!(report.levels[0].mean_sales, 150.0);
        assert_eq!(report.levels[0].mean_demand, 167.0);
    }

    #[test]
    fn zero_prior_demand_pair_is_skipped() {
        let records = vec![
            widget(0.9, 0.0, 0.0),
            widget(1.0, 100.0, 100.0),
            widget(1.1, 90.0, 82.0),
        ];
        let report = ElasticityEstimator::new().estimate(&records, "Widget").unwrap();
        // Only the 1.0 -> 1.1 pair is computable.
        assert_eq!(report.pair_elasticities.len(), 1);
        assert!(report.avg_elasticity.is_finite());
    }

    #[test]
    fn interpretation_tracks_elasticity_sign() {
        let records = vec![
            widget(0.9, 10800.0, 120.0),
            widget(1.0, 10000.0, 100.0),
            widget(1.1, 8800.0, 80.0),
        ];
        let report = ElasticityEstimator::new().estimate(&records, "Widget").unwrap();
        assert!(report.interpretation().starts_with("elastic"));
    }
}
