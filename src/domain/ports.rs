use crate::domain::catalog::{AccessoryTable, ProductMapping};
use crate::domain::model::{BatchResult, QuoteRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only access to the product catalog.
pub trait CatalogLookup: Send + Sync {
    /// Board products in authored order; resolution depends on this order.
    fn mappings(&self) -> &[ProductMapping];
    fn accessories(&self) -> &AccessoryTable;
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for Arc<T> {
    fn mappings(&self) -> &[ProductMapping] {
        (**self).mappings()
    }

    fn accessories(&self) -> &AccessoryTable {
        (**self).accessories()
    }
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn mappings(&self) -> &[ProductMapping] {
        (**self).mappings()
    }

    fn accessories(&self) -> &AccessoryTable {
        (**self).accessories()
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<QuoteRequest>>;
    async fn transform(&self, requests: Vec<QuoteRequest>) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<String>;
}
