use crate::core::estimator::Estimator;
use crate::core::{CatalogLookup, Pipeline, QuoteRequest, Storage};
use crate::domain::model::{BatchResult, BatchRow, EstimateOutcome};
use crate::utils::error::{CalcError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

pub const REPORT_JSON: &str = "estimates.json";
pub const REPORT_CSV: &str = "estimates.csv";

/// Estimates every request of a CSV file and writes a JSON and a CSV report.
pub struct BatchPipeline<S: Storage, C: CatalogLookup + 'static> {
    storage: S,
    estimator: Arc<Estimator<C>>,
    input_file: String,
    output_dir: String,
}

impl<S: Storage, C: CatalogLookup + 'static> BatchPipeline<S, C> {
    pub fn new(
        storage: S,
        estimator: Arc<Estimator<C>>,
        input_file: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            estimator,
            input_file: input_file.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// One CSV report row: a line item, or the error of a rejected request.
#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    row: usize,
    family: &'a str,
    subtype: &'a str,
    length_m: f64,
    width_m: f64,
    surface_m2: Option<f64>,
    kind: Option<&'static str>,
    product_id: Option<u64>,
    variant_id: Option<u64>,
    qty: Option<u32>,
    summary: &'a str,
    error: &'a str,
}

fn csv_report(result: &BatchResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in &result.rows {
        let base = ReportLine {
            row: row.row,
            family: &row.request.family,
            subtype: &row.request.subtype,
            length_m: row.request.length_m,
            width_m: row.request.width_m,
            surface_m2: None,
            kind: None,
            product_id: None,
            variant_id: None,
            qty: None,
            summary: "",
            error: "",
        };
        match &row.outcome {
            EstimateOutcome::Estimate(estimate) => {
                for line in &estimate.lines {
                    writer.serialize(ReportLine {
                        surface_m2: Some(estimate.surface_m2),
                        kind: Some(match line.kind {
                            crate::domain::model::LineKind::Simple => "simple",
                            crate::domain::model::LineKind::Variant => "variant",
                        }),
                        product_id: Some(line.product_id),
                        variant_id: line.variant_id,
                        qty: Some(line.qty),
                        summary: &line.summary,
                        ..base
                    })?;
                }
            }
            EstimateOutcome::Error { error } => {
                writer.serialize(ReportLine { error, ..base })?;
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| CalcError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: CatalogLookup + 'static> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<QuoteRequest>> {
        tracing::debug!("Reading requests from: {}", self.input_file);
        let data = self.storage.read_file(&self.input_file).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());
        let requests = reader
            .deserialize::<QuoteRequest>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(requests)
    }

    async fn transform(&self, requests: Vec<QuoteRequest>) -> Result<BatchResult> {
        let total = requests.len();
        let mut tasks = JoinSet::new();

        for (index, request) in requests.into_iter().enumerate() {
            let estimator = Arc::clone(&self.estimator);
            tasks.spawn_blocking(move || {
                let row = index + 1;
                let _span = tracing::info_span!("estimate_row", row).entered();
                let result = estimator.estimate(&request);
                if let Err(e) = &result {
                    tracing::debug!("Row {} rejected: {}", row, e);
                }
                BatchRow {
                    row,
                    request,
                    outcome: EstimateOutcome::from(result),
                }
            });
        }

        let mut rows = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let row = joined.map_err(|e| CalcError::TaskError {
                message: e.to_string(),
            })?;
            rows.push(row);
        }
        // tasks finish in any order; the report follows the input file
        rows.sort_by_key(|r| r.row);

        Ok(BatchResult {
            generated_at: chrono::Utc::now(),
            rows,
        })
    }

    async fn load(&self, result: BatchResult) -> Result<String> {
        let json = serde_json::to_vec_pretty(&result)?;
        tracing::debug!("Writing {} ({} bytes)", REPORT_JSON, json.len());
        self.storage.write_file(REPORT_JSON, &json).await?;

        let csv_data = csv_report(&result)?;
        tracing::debug!("Writing {} ({} bytes)", REPORT_CSV, csv_data.len());
        self.storage.write_file(REPORT_CSV, &csv_data).await?;

        Ok(format!("{}/{}", self.output_dir, REPORT_JSON))
    }
}
