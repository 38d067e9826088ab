pub mod accessories;
pub mod batch_pipeline;
pub mod engine;
pub mod estimator;
pub mod layout;
pub mod resolver;

pub use crate::domain::model::{BatchResult, Estimate, LayoutResult, LineItem, QuoteRequest};
pub use crate::domain::ports::{CatalogLookup, Pipeline, Storage};
pub use crate::utils::error::Result;
