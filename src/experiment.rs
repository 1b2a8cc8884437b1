use crate::models::{
    AbTestRecord, AnalysisConfig, ExperimentReport, VariantComparison, VariantSummary,
};
use std::collections::HashMap;

/// Experiment names in first-encountered order.
pub fn experiment_names(records: &[AbTestRecord]) -> Vec<String> {
    let mut names = Vec::new();
    for record in records {
        if !names.iter().any(|n| n == &record.experiment) {
            names.push(record.experiment.clone());
        }
    }
    names
}

pub struct ExperimentEvaluator {
    config: AnalysisConfig,
}

impl ExperimentEvaluator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Aggregate per-variant metrics for one experiment and compare every
    /// non-baseline variant against the baseline (the first variant seen).
    /// Returns None when no record carries the experiment name.
    pub fn evaluate(&self, records: &[AbTestRecord], experiment: &str) -> Option<ExperimentReport> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&AbTestRecord>> = HashMap::new();

        for record in records.iter().filter(|r| r.experiment == experiment) {
            if !groups.contains_key(record.variant.as_str()) {
                order.push(&record.variant);
            }
            groups.entry(&record.variant).or_default().push(record);
        }

        if order.is_empty() {
            return None;
        }

        let variants: Vec<VariantSummary> = order
            .iter()
            .map(|name| Self::summarize(name, &groups[name]))
            .collect();

        let comparisons = variants[1..]
            .iter()
            .map(|variant| self.compare(&variants[0], variant))
            .collect();

        let best_variant = Self::best_variant(&variants);

        Some(ExperimentReport {
            experiment: experiment.to_string(),
            variants,
            comparisons,
            best_variant,
        })
    }

    fn summarize(variant: &str, records: &[&AbTestRecord]) -> VariantSummary {
        // Days with zero visitors carry a NaN rate; they drop out of the mean
        // and std so one dead day cannot poison the variant's comparison.
        let rates: Vec<f64> = records
            .iter()
            .map(|r| r.conversion_rate)
            .filter(|r| r.is_finite())
            .collect();
        let (mean_conversion, std_conversion) = mean_and_std(&rates);

        VariantSummary {
            variant: variant.to_string(),
            mean_conversion,
            std_conversion,
            total_visitors: records.iter().map(|r| r.visitors).sum(),
            total_conversions: records.iter().map(|r| r.conversions).sum(),
            total_revenue: records.iter().map(|r| r.revenue).sum(),
        }
    }

    /// Two-sample z comparison of a variant against the baseline.
    pub fn compare(&self, baseline: &VariantSummary, variant: &VariantSummary) -> VariantComparison {
        let std_error = match (baseline.std_conversion, variant.std_conversion) {
            (Some(sb), Some(sv)) if baseline.total_visitors > 0 && variant.total_visitors > 0 => {
                let nb = baseline.total_visitors as f64;
                let nv = variant.total_visitors as f64;
                Some((sb * sb / nb + sv * sv / nv).sqrt())
            }
            _ => None,
        };

        let z_score = match (std_error, baseline.mean_conversion, variant.mean_conversion) {
            (Some(se), Some(rb), Some(rv)) if se > 0.0 => Some((rv - rb) / se),
            _ => None,
        };

        let lift_pct = match (baseline.mean_conversion, variant.mean_conversion) {
            (Some(rb), Some(rv)) if rb != 0.0 => Some((rv - rb) / rb * 100.0),
            _ => None,
        };

        VariantComparison {
            variant: variant.variant.clone(),
            baseline: baseline.variant.clone(),
            std_error,
            z_score,
            significant: z_score.map_or(false, |z| z.abs() > self.config.z_threshold),
            lift_pct,
        }
    }

    fn best_variant(variants: &[VariantSummary]) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;
        for summary in variants {
            if let Some(mean) = summary.mean_conversion {
                // Strict comparison keeps the first-encountered variant on ties.
                if best.map_or(true, |(_, m)| mean > m) {
                    best = Some((&summary.variant, mean));
                }
            }
        }
        best.map(|(name, _)| name.to_string())
    }
}

fn mean_and_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std = if values.len() > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (values.len() as f64 - 1.0);
        Some(var.sqrt())
    } else {
        None
    };
    (Some(mean), std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn rec(variant: &str, d: u32, visitors: u64, conversions: u64) -> AbTestRecord {
        AbTestRecord::new("Homepage", variant, day(d), visitors, conversions, 100.0)
    }

    fn evaluator() -> ExperimentEvaluator {
        ExperimentEvaluator::new(AnalysisConfig::default())
    }

    #[test]
    fn missing_experiment_yields_none() {
        let records = vec![rec("A", 1, 100, 5)];
        assert!(evaluator().evaluate(&records, "Checkout").is_none());
    }

    #[test]
    fn best_variant_is_max_mean_conversion() {
        let records = vec![
            rec("A", 1, 1000, 30),
            rec("A", 2, 1000, 32),
            rec("B", 1, 1000, 45),
            rec("B", 2, 1000, 47),
            rec("C", 1, 1000, 10),
            rec("C", 2, 1000, 12),
        ];
        let report = evaluator().evaluate(&records, "Homepage").unwrap();
        assert_eq!(report.best_variant.as_deref(), Some("B"));
        assert_eq!(report.variants[0].variant, "A"); // baseline is first seen
        assert_eq!(report.comparisons.len(), 2);
    }

    #[test]
    fn best_variant_tie_goes_to_first_encountered() {
        let records = vec![
            rec("A", 1, 1000, 30),
            rec("A", 2, 1000, 40),
            rec("B", 1, 1000, 40),
            rec("B", 2, 1000, 30),
        ];
        let report = evaluator().evaluate(&records, "Homepage").unwrap();
        assert_eq!(report.best_variant.as_deref(), Some("A"));
    }

    #[test]
    fn homepage_scenario_flags_b_significant() {
        // Rates 3.0% vs 4.5% with equal std 0.5 over 1000 visitors each.
        let a = VariantSummary {
            variant: "A".into(),
            mean_conversion: Some(3.0),
            std_conversion: Some(0.5),
            total_visitors: 1000,
            total_conversions: 30,
            total_revenue: 0.0,
        };
        let b = VariantSummary {
            variant: "B".into(),
            mean_conversion: Some(4.5),
            std_conversion: Some(0.5),
            total_visitors: 1000,
            total_conversions: 45,
            total_revenue: 0.0,
        };
        let cmp = evaluator().compare(&a, &b);
        let z = cmp.z_score.unwrap();
        assert!(z > 1.96, "z = {z}");
        assert!(cmp.significant);
        assert!((cmp.lift_pct.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn z_score_sign_flips_when_sides_swap() {
        let a = VariantSummary {
            variant: "A".into(),
            mean_conversion: Some(3.0),
            std_conversion: Some(0.5),
            total_visitors: 1000,
            total_conversions: 30,
            total_revenue: 0.0,
        };
        let b = VariantSummary {
            variant: "B".into(),
            mean_conversion: Some(4.5),
            std_conversion: Some(0.5),
            total_visitors: 1000,
            total_conversions: 45,
            total_revenue: 0.0,
        };
        let ab = evaluator().compare(&a, &b).z_score.unwrap();
        let ba = evaluator().compare(&b, &a).z_score.unwrap();
        assert!((ab + ba).abs() < 1e-12);
        assert!((ab.abs() - ba.abs()).abs() < 1e-12);
    }

    #[test]
    fn zero_visitor_variant_does_not_poison_others() {
        let records = vec![
            rec("A", 1, 1000, 30),
            rec("A", 2, 1000, 32),
            rec("B", 1, 1000, 45),
            rec("B", 2, 1000, 47),
            rec("Z", 1, 0, 0),
            rec("Z", 2, 0, 0),
        ];
        let report = evaluator().evaluate(&records, "Homepage").unwrap();

        let z_summary = report.variants.iter().find(|v| v.variant == "Z").unwrap();
        assert!(z_summary.mean_conversion.is_none());
        assert!(z_summary.std_conversion.is_none());

        let b_cmp = report.comparisons.iter().find(|c| c.variant == "B").unwrap();
        assert!(b_cmp.z_score.is_some());
        let z_cmp = report.comparisons.iter().find(|c| c.variant == "Z").unwrap();
        assert!(z_cmp.z_score.is_none());
        assert!(!z_cmp.significant);

        assert_eq!(report.best_variant.as_deref(), Some("B"));
    }

    #[test]
    fn zero_baseline_rate_leaves_lift_undefined() {
        let records = vec![
            rec("A", 1, 1000, 0),
            rec("A", 2, 1000, 0),
            rec("B", 1, 1000, 45),
            rec("B", 2, 1000, 47),
        ];
        let report = evaluator().evaluate(&records, "Homepage").unwrap();
        assert!(report.comparisons[0].lift_pct.is_none());
    }

    #[test]
    fn experiment_names_keep_first_encountered_order() {
        let mut records = vec![rec("A", 1, 10, 1)];
        records.push(AbTestRecord::new("Checkout", "A", day(1), 10, 1, 5.0));
        records.push(rec("B", 2, 10, 1));
        assert_eq!(experiment_names(&records), vec!["Homepage", "Checkout"]);
    }

    #[test]
    fn report_round_trips_through_json_losslessly() {
        let records = vec![
            rec("A", 1, 1000, 30),
            rec("A", 2, 1000, 33),
            rec("B", 1, 1000, 45),
            rec("B", 2, 1000, 48),
        ];
        let report = evaluator().evaluate(&records, "Homepage").unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: ExperimentReport = serde_json::from_str(&json).unwrap();

        for (orig, rt) in report.variants.iter().zip(&back.variants) {
            assert_eq!(orig.mean_conversion, rt.mean_conversion);
            assert_eq!(orig.std_conversion, rt.std_conversion);
            assert_eq!(orig.total_revenue, rt.total_revenue);
        }
        for (orig, rt) in report.comparisons.iter().zip(&back.comparisons) {
            assert_eq!(orig.z_score, rt.z_score);
            assert_eq!(orig.lift_pct, rt.lift_pct);
        }
    }
}
