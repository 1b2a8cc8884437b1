pub mod cache;
pub mod data_loader;
pub mod elasticity;
pub mod experiment;
pub mod forecast;
pub mod models;

pub use cache::{cache_key, AnalysisCache};
pub use data_loader::DataLoader;
pub use elasticity::ElasticityEstimator;
pub use experiment::ExperimentEvaluator;
pub use forecast::TrendForecaster;
pub use models::{
    AbTestRecord, AnalysisConfig, ElasticityReport, ExperimentReport, ForecastReport, PricePoint,
    SeriesPoint,
};
