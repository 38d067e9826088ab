use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a batch pipeline through extract, transform and load.
pub struct QuoteEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> QuoteEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting batch estimation...");

        tracing::debug!("Reading quote requests...");
        let requests = self.pipeline.extract().await?;
        tracing::info!("Read {} quote requests", requests.len());

        tracing::debug!("Estimating...");
        let result = self.pipeline.transform(requests).await?;
        tracing::info!(
            "Estimated {} requests ({} rejected)",
            result.rows.len(),
            result.error_count()
        );

        tracing::debug!("Writing report...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BatchResult, QuoteRequest};
    use crate::domain::model::{BatchRow, EstimateOutcome};
    use crate::utils::error::CalcError;
    use async_trait::async_trait;

    struct StubPipeline {
        fail_load: bool,
    }

    #[async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<QuoteRequest>> {
            Ok(vec![QuoteRequest::new("wood", 0.0, 3.0)])
        }

        async fn transform(&self, requests: Vec<QuoteRequest>) -> Result<BatchResult> {
            let rows = requests
                .into_iter()
                .enumerate()
                .map(|(i, request)| BatchRow {
                    row: i + 1,
                    request,
                    outcome: EstimateOutcome::Error {
                        error: "Invalid input. Please enter a length and width.".to_string(),
                    },
                })
                .collect();
            Ok(BatchResult {
                generated_at: chrono::Utc::now(),
                rows,
            })
        }

        async fn load(&self, result: BatchResult) -> Result<String> {
            if self.fail_load {
                return Err(CalcError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            Ok(format!("out/{}-rows.json", result.rows.len()))
        }
    }

    #[tokio::test]
    async fn test_run_returns_report_path() {
        let engine = QuoteEngine::new(StubPipeline { fail_load: false });
        assert_eq!(engine.run().await.unwrap(), "out/1-rows.json");
    }

    #[tokio::test]
    async fn test_run_propagates_load_errors() {
        let engine = QuoteEngine::new(StubPipeline { fail_load: true });
        assert!(matches!(engine.run().await, Err(CalcError::IoError(_))));
    }
}
