pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig, OutputFormat};

pub use config::catalog_config::CatalogConfig;
pub use core::{batch_pipeline::BatchPipeline, engine::QuoteEngine, estimator::Estimator};
pub use domain::catalog::Catalog;
pub use domain::model::{Estimate, EstimateOutcome, LineItem, LineKind, QuoteRequest};
pub use utils::error::{CalcError, Result};
