use chrono::{Duration, NaiveDate};
use promo_analytics::{
    AbTestRecord, AnalysisConfig, ElasticityEstimator, ExperimentEvaluator, PricePoint,
    SeriesPoint, TrendForecaster,
};

fn main() {
    let config = AnalysisConfig::default();
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    // A/B experiment: variant B converts noticeably better than A.
    let mut ab_records = vec![];
    for day in 0..7 {
        let date = start + Duration::days(day);
        ab_records.push(AbTestRecord::new(
            "Homepage", "A", date, 1000, 30 + day as u64, 1500.0,
        ));
        ab_records.push(AbTestRecord::new(
            "Homepage", "B", date, 1000, 45 + day as u64, 2250.0,
        ));
    }

    let evaluator = ExperimentEvaluator::new(config.clone());
    let report = evaluator.evaluate(&ab_records, "Homepage").unwrap();

    println!("A/B Experiment: {}", report.experiment);
    for summary in &report.variants {
        println!(
            "  {}: mean conversion {:.2}% over {} visitors",
            summary.variant,
            summary.mean_conversion.unwrap_or(f64::NAN),
            summary.total_visitors
        );
    }
    for cmp in &report.comparisons {
        println!(
            "  {} vs {}: lift {:.1}%, significant: {}",
            cmp.variant,
            cmp.baseline,
            cmp.lift_pct.unwrap_or(f64::NAN),
            cmp.significant
        );
    }
    println!("  Best variant: {}", report.best_variant.as_deref().unwrap_or("n/a"));
    println!();

    // Price elasticity: demand falls as the multiplier rises.
    let price_points = vec![
        PricePoint::new("Widget", 0.9, 10800.0, 120.0),
        PricePoint::new("Widget", 1.0, 10000.0, 100.0),
        PricePoint::new("Widget", 1.1, 8800.0, 80.0),
    ];
    let elasticity = ElasticityEstimator::new()
        .estimate(&price_points, "Widget")
        .unwrap();
    println!("Elasticity for Widget: {:.2}", elasticity.avg_elasticity);
    println!("  {}", elasticity.interpretation());
    println!("  Recommended multiplier: {}", elasticity.optimal_multiplier);
    println!();

    // Trend forecast over two weeks of daily sales.
    let series: Vec<SeriesPoint> = (0..14)
        .map(|day| SeriesPoint {
            date: start + Duration::days(day),
            value: 50_000.0 + 1_200.0 * day as f64,
        })
        .collect();
    let forecast = TrendForecaster::new(config).forecast(&series);
    println!("Sales forecast:");
    for point in forecast.projected() {
        println!("  {}: {:.0} (projected)", point.date, point.value);
    }
}
