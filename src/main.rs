use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use promo_analytics::{
    elasticity::product_names, experiment::experiment_names, forecast::daily_growth,
    AnalysisConfig, DataLoader, ElasticityEstimator, ElasticityReport, ExperimentEvaluator,
    ExperimentReport, ForecastReport, TrendForecaster,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promo_analytics")]
#[command(about = "Evaluate A/B experiments, price elasticity and sales trends for a promo event")]
struct Args {
    /// Which analysis to run
    #[arg(short, long, value_enum)]
    report: ReportKind,

    /// A/B test records CSV (required for the experiments report)
    #[arg(long)]
    ab_file: Option<PathBuf>,

    /// Price point records CSV (required for the elasticity report)
    #[arg(long)]
    elasticity_file: Option<PathBuf>,

    /// Raw sales rows CSV (required for the forecast report)
    #[arg(long)]
    sales_file: Option<PathBuf>,

    /// Experiment name to evaluate (or "ALL")
    #[arg(short, long, default_value = "ALL")]
    experiment: String,

    /// Product name to analyze (or "ALL")
    #[arg(short, long, default_value = "ALL")]
    product: String,

    /// Significance threshold on |z|
    #[arg(long, default_value = "1.96")]
    threshold: f64,

    /// Trailing window for the drift forecast anchor
    #[arg(long, default_value = "7")]
    window: usize,

    /// Days to project forward
    #[arg(long, default_value = "7")]
    horizon: usize,

    /// Forecast strategy
    #[arg(long, value_enum, default_value = "regression")]
    strategy: Strategy,

    /// RNG seed for the drift strategy (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Experiments,
    Elasticity,
    Forecast,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Regression,
    Drift,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AnalysisConfig {
        z_threshold: args.threshold,
        window: args.window,
        horizon: args.horizon,
        ..AnalysisConfig::default()
    };
    let loader = DataLoader::new();

    match args.report {
        ReportKind::Experiments => run_experiments(&args, &config, &loader),
        ReportKind::Elasticity => run_elasticity(&args, &loader),
        ReportKind::Forecast => run_forecast(&args, &config, &loader),
    }
}

fn run_experiments(args: &Args, config: &AnalysisConfig, loader: &DataLoader) -> Result<()> {
    let path = args
        .ab_file
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("--ab-file is required for the experiments report"))?;
    let records = loader.load_ab_records(path)?;

    let names: Vec<String> = if args.experiment == "ALL" {
        experiment_names(&records)
    } else {
        vec![args.experiment.clone()]
    };
    if names.is_empty() {
        anyhow::bail!("no experiments found in {}", path.display());
    }
    info!("evaluating {} experiments", names.len());

    let evaluator = ExperimentEvaluator::new(config.clone());
    let reports: Vec<ExperimentReport> = names
        .par_iter()
        .filter_map(|name| evaluator.evaluate(&records, name))
        .collect();

    if reports.is_empty() {
        anyhow::bail!("no records found for experiment '{}'", args.experiment);
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Csv => {
            println!("Experiment,Variant,MeanConversion,StdConversion,Visitors,Conversions,Revenue,ZScore,Significant,LiftPct");
            for report in &reports {
                for summary in &report.variants {
                    let cmp = report
                        .comparisons
                        .iter()
                        .find(|c| c.variant == summary.variant);
                    println!(
                        "{},{},{},{},{},{},{:.2},{},{},{}",
                        report.experiment,
                        summary.variant,
                        fmt_opt(summary.mean_conversion),
                        fmt_opt(summary.std_conversion),
                        summary.total_visitors,
                        summary.total_conversions,
                        summary.total_revenue,
                        fmt_opt(cmp.and_then(|c| c.z_score)),
                        cmp.map_or(String::new(), |c| c.significant.to_string()),
                        fmt_opt(cmp.and_then(|c| c.lift_pct)),
                    );
                }
            }
        }
        OutputFormat::Summary => {
            println!("A/B Experiment Summary");
            println!("======================");
            for report in &reports {
                println!();
                println!("Experiment: {}", report.experiment);
                for summary in &report.variants {
                    println!(
                        "  {}: conversion {} ({} visitors, {:.2} revenue)",
                        summary.variant,
                        fmt_opt(summary.mean_conversion),
                        summary.total_visitors,
                        summary.total_revenue
                    );
                }
                for cmp in &report.comparisons {
                    println!(
                        "  {} vs {}: z = {}, lift = {}%, significant = {}",
                        cmp.variant,
                        cmp.baseline,
                        fmt_opt(cmp.z_score),
                        fmt_opt(cmp.lift_pct),
                        cmp.significant
                    );
                }
                match &report.best_variant {
                    Some(best) => println!("  Recommended variant: {}", best),
                    None => println!("  Recommended variant: undetermined"),
                }
            }
        }
    }
    Ok(())
}

fn run_elasticity(args: &Args, loader: &DataLoader) -> Result<()> {
    let path = args
        .elasticity_file
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("--elasticity-file is required for the elasticity report"))?;
    let records = loader.load_price_points(path)?;

    let names: Vec<String> = if args.product == "ALL" {
        product_names(&records)
    } else {
        vec![args.product.clone()]
    };
    if names.is_empty() {
        anyhow::bail!("no products found in {}", path.display());
    }
    info!("analyzing {} products", names.len());

    let estimator = ElasticityEstimator::new();
    let reports: Vec<ElasticityReport> = names
        .par_iter()
        .filter_map(|name| estimator.estimate(&records, name))
        .collect();

    if reports.is_empty() {
        anyhow::bail!("no records found for product '{}'", args.product);
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Csv => {
            println!("Product,AvgElasticity,Elastic,OptimalMultiplier,Levels");
            for report in &reports {
                println!(
                    "{},{:.4},{},{},{}",
                    report.product,
                    report.avg_elasticity,
                    report.elastic,
                    report.optimal_multiplier,
                    report.levels.len()
                );
            }
        }
        OutputFormat::Summary => {
            println!("Price Elasticity Summary");
            println!("========================");
            for report in &reports {
                println!();
                println!("Product: {}", report.product);
                println!(
                    "  Average elasticity: {:.2} ({})",
                    report.avg_elasticity,
                    if report.elastic { "elastic" } else { "inelastic" }
                );
                println!("  Recommended multiplier: {}", report.optimal_multiplier);
                println!("  {}", report.interpretation());
                for level in &report.levels {
                    println!(
                        "    x{}: mean sales {:.2}, mean demand {:.2}",
                        level.price_multiplier, level.mean_sales, level.mean_demand
                    );
                }
            }
        }
    }
    Ok(())
}

fn run_forecast(args: &Args, config: &AnalysisConfig, loader: &DataLoader) -> Result<()> {
    let path = args
        .sales_file
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("--sales-file is required for the forecast report"))?;
    let series = loader.load_daily_sales(path)?;

    let forecaster = TrendForecaster::new(config.clone());
    let report: ForecastReport = match args.strategy {
        Strategy::Regression => forecaster.forecast(&series),
        Strategy::Drift => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            forecaster.forecast_drift(&series, &mut rng)
        }
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            println!("Date,Value,Projected");
            for point in &report.points {
                println!("{},{:.2},{}", point.date, point.value, point.projected);
            }
        }
        OutputFormat::Summary => {
            println!("Sales Trend Forecast");
            println!("====================");
            println!("Observed days: {}", report.observed().count());
            println!("Projected days: {}", report.projected().count());
            match daily_growth(&series) {
                Some(growth) => println!("Day-over-day growth: {:+.1}%", growth),
                None => println!("Day-over-day growth: n/a"),
            }
            for point in report.projected() {
                println!("  {}: {:.2} (projected)", point.date, point.value);
            }
        }
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{:.4}", v))
}
