use anyhow::Context;
use clap::Parser;
use decking_calc::utils::error::ErrorSeverity;
use decking_calc::utils::logger;
use decking_calc::{BatchPipeline, Catalog, Estimator, LocalStorage, QuoteEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "batch-estimate")]
#[command(about = "Estimates every deck of a CSV file and writes JSON and CSV reports")]
struct Args {
    /// CSV file with columns family,subtype,thickness_mm,length_m,width_m,color,mounting,stake_size
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for estimates.json and estimates.csv
    #[arg(short, long, default_value = "./output")]
    output: String,

    /// TOML catalog replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines instead of text
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting batch estimation");
    tracing::info!("📁 Input: {}", args.input.display());

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("failed to load catalog '{}'", path.display()))?,
        None => Catalog::builtin().context("built-in catalog is invalid")?,
    };
    let estimator = Arc::new(Estimator::new(catalog));

    // the input is read through the same storage, relative to the working directory
    let input = absolute(&args.input)?;
    let storage = LocalStorage::new(args.output.clone());
    let pipeline = BatchPipeline::new(storage, estimator, input, args.output.clone());
    let engine = QuoteEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Batch estimation completed");
            println!("✅ Batch estimation completed!");
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Batch estimation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn absolute(path: &Path) -> anyhow::Result<String> {
    let path = std::path::absolute(path)
        .with_context(|| format!("invalid input path '{}'", path.display()))?;
    Ok(path.to_string_lossy().into_owned())
}
