//! CLI entry point for the cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use price_cleaner::{CleanerConfig, CleaningPipeline, CleaningSummary, ReportGenerator};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Median/mode imputation and IQR outlier removal for delimited files",
    long_about = "Loads a delimited file, fills missing values (median for numeric \
                  columns, mode for categorical ones), drops rows whose target column \
                  lies outside [Q1 - k*IQR, Q3 + k*IQR], and writes the result.\n\n\
                  EXAMPLES:\n  \
                  # Default paths\n  \
                  price-cleaner\n\n  \
                  # Explicit input and output\n  \
                  price-cleaner -i raw/houses.csv -o clean/houses.csv\n\n  \
                  # Preview without writing\n  \
                  price-cleaner -i raw/houses.csv --dry-run\n\n  \
                  # Machine-readable summary\n  \
                  price-cleaner -i raw/houses.csv --json | jq .rows_removed"
)]
struct Args {
    /// Path to the delimited input file
    #[arg(short, long, default_value = "datos/crudo/house_data.csv")]
    input: String,

    /// Path of the cleaned output file (parent directories are created)
    #[arg(short, long, default_value = "datos/procesado/cleaned_house_data.csv")]
    output: String,

    /// Numeric column used for outlier detection
    #[arg(short, long, default_value = "price")]
    target: String,

    /// Fence multiplier k in [Q1 - k*IQR, Q3 + k*IQR]
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Field separator for input and output
    #[arg(long, default_value = ",")]
    separator: char,

    /// Load and clean in memory, print what would change, write nothing
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout instead of a text summary
    ///
    /// Disables all logs so stdout carries only JSON.
    #[arg(long)]
    json: bool,

    /// Write a JSON report next to the output file as <output_stem>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env first so RUST_LOG set there reaches the filter
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.separator.is_ascii() {
        return Err(anyhow!(
            "Separator must be a single ASCII character, got {:?}",
            args.separator
        ));
    }

    let config = CleanerConfig::builder()
        .target_column(&args.target)
        .iqr_multiplier(args.iqr_multiplier)
        .separator(args.separator as u8)
        .build()?;

    let pipeline = CleaningPipeline::builder().config(config).build()?;

    let outcome = if args.dry_run {
        run_dry_run(&pipeline, &args)
    } else {
        run_pipeline(&pipeline, &args)
    };

    match outcome {
        Ok(summary) => handle_output(&summary, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            error!("Cleaning failed: {}", e);
            Err(anyhow!("Cleaning failed: {}", e))
        }
    }
}

/// Load and clean without touching the filesystem.
fn run_dry_run(
    pipeline: &CleaningPipeline,
    args: &Args,
) -> price_cleaner::error::Result<CleaningSummary> {
    info!("Dry run: nothing will be written");
    let table = pipeline.load(&args.input)?;
    let mut result = pipeline.clean(&table)?;
    result.summary.input_file = Some(args.input.clone());
    Ok(result.summary)
}

fn run_pipeline(
    pipeline: &CleaningPipeline,
    args: &Args,
) -> price_cleaner::error::Result<CleaningSummary> {
    let result = pipeline.run(&args.input, &args.output)?;
    Ok(result.summary)
}

/// Handle run output based on CLI flags.
///
/// - Default: print a human-readable summary to stdout
/// - `--json`: print the summary as JSON to stdout only
/// - `--emit-report`: also write the JSON report to disk
fn handle_output(summary: &CleaningSummary, args: &Args) -> Result<()> {
    if args.emit_report && !args.dry_run {
        let report_path = ReportGenerator::for_output(&args.output).write_report_to_file(summary)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    print_human_readable_summary(summary, args);
    Ok(())
}

/// Print a human-readable summary of the run.
///
/// Uses `println!` rather than logging: this is the command's result and
/// should show regardless of the log level.
fn print_human_readable_summary(summary: &CleaningSummary, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    if args.dry_run {
        println!("DRY RUN - nothing was written");
    } else {
        println!("CLEANING COMPLETE");
    }
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, summary.rows_before, summary.columns_before
    );
    if let Some(ref output_file) = summary.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_after, summary.columns_after
        );
    } else {
        println!(
            "Result: {} rows x {} columns",
            summary.rows_after, summary.columns_after
        );
    }
    println!();

    println!("{:<24} {:<12} {:<10} {:<20}", "Column", "Kind", "Missing", "Filled with");
    println!("{}", "-".repeat(70));
    for col in &summary.schema {
        let imputation = summary.imputations.iter().find(|i| i.column == col.name);
        let (missing, fill) = match imputation {
            Some(i) => (
                i.missing_count.to_string(),
                format!("{} {}", i.fill_value.method(), i.fill_value),
            ),
            None => ("0".to_string(), "-".to_string()),
        };
        println!(
            "{:<24} {:<12} {:<10} {:<20}",
            truncate_str(&col.name, 23),
            col.kind,
            missing,
            truncate_str(&fill, 40)
        );
    }
    println!();

    let outliers = &summary.outliers;
    match outliers.bounds {
        Some(bounds) => {
            println!(
                "Outliers in '{}': Q1={} Q3={} IQR={} bounds=[{}, {}]",
                outliers.column, bounds.q1, bounds.q3, bounds.iqr, bounds.lower, bounds.upper
            );
            println!("  {} rows removed", outliers.outliers_removed);
        }
        None => println!("Outliers in '{}': no values to check", outliers.column),
    }
    println!();

    println!("Duration: {}ms", summary.duration_ms);
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
