use anyhow::Context;
use clap::Parser;
use decking_calc::utils::error::ErrorSeverity;
use decking_calc::utils::{logger, validation::Validate};
use decking_calc::{Catalog, CliConfig, Estimate, EstimateOutcome, Estimator, OutputFormat};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // the request itself was rejected
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn print_text(estimate: &Estimate) {
    println!("Surface: {:.2} m²", estimate.surface_m2);
    for line in &estimate.lines {
        match line.variant_id {
            Some(variant_id) => println!(
                "  {:>4} x [{}/{}] {}",
                line.qty, line.product_id, variant_id, line.summary
            ),
            None => println!("  {:>4} x [{}] {}", line.qty, line.product_id, line.summary),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(e.severity()));
    }

    let catalog = match &config.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("failed to load catalog '{}'", path.display()))?,
        None => Catalog::builtin().context("built-in catalog is invalid")?,
    };
    let estimator = Estimator::new(catalog);

    let request = config.to_request()?;
    let result = estimator.estimate(&request);

    let severity = result.as_ref().err().map(|e| {
        tracing::warn!(
            "Request rejected: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        e.severity()
    });

    match config.format {
        OutputFormat::Json => {
            let outcome = EstimateOutcome::from(result);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Text => match &result {
            Ok(estimate) => print_text(estimate),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
            }
        },
    }

    if let Some(severity) = severity {
        std::process::exit(exit_code(severity));
    }
    Ok(())
}
