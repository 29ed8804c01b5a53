//! parpfa: Principal Feature Analysis CLI Tool
//!
//! Loads a dataset, runs the principal feature analysis and writes a JSON
//! report of the consensus principal features.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use parpfa::cli::Cli;
use parpfa::pipeline::{
    dataset_from_frame, load_dataset, principal_feature_analysis, SilentObserver, SweepObserver,
};
use parpfa::report::{export_analysis, ConsensusSummary, ExportParams};
use parpfa::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning, ProgressObserver,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let report_path = cli.report_path();
    let config = cli.config();
    config.validate().context("Invalid analysis configuration")?;

    let quiet = cli.quiet;
    let outputs = if cli.output_columns.is_empty() {
        format!("first {}", config.number_output_functions)
    } else {
        cli.output_columns.join(", ")
    };

    if !quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&cli.input, &outputs, &report_path, cli.layout, &config);
    }

    // Step 1: Load dataset
    let step_start = Instant::now();
    if !quiet {
        print_step_header(1, "Load Dataset");
    }
    let spinner = (!quiet).then(|| create_spinner("Loading dataset..."));
    let df = load_dataset(&cli.input, cli.layout, cli.infer_schema_length)?;
    let dataset = dataset_from_frame(&df, cli.layout, &cli.output_columns)
        .with_context(|| format!("Failed to prepare data from {}", cli.input.display()))?;
    drop(df);
    if let Some(spinner) = &spinner {
        finish_with_success(spinner, "Dataset loaded");
    }

    if config.number_output_functions >= dataset.row_count() {
        anyhow::bail!(
            "{} output(s) requested but the dataset only has {} variable(s)",
            config.number_output_functions,
            dataset.row_count()
        );
    }

    if !quiet {
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Variables: {}", dataset.row_count());
        println!(
            "      Outputs: {}",
            dataset.names()[..config.number_output_functions].join(", ")
        );
        println!("      Data points: {}", dataset.point_count());
        print_step_time(step_start.elapsed());
    }

    // Step 2: Principal feature analysis
    let step_start = Instant::now();
    if !quiet {
        print_step_header(2, "Principal Feature Analysis");
    }
    let progress = (!quiet).then(|| ProgressObserver::new(config.number_sweeps));
    let observer: &dyn SweepObserver = match &progress {
        Some(progress) => progress,
        None => &SilentObserver,
    };
    let report = principal_feature_analysis(&dataset, &config, observer)
        .context("Principal feature analysis failed")?;

    if let Some(progress) = &progress {
        if report.failed_sweeps.is_empty() {
            finish_with_success(progress.bar(), "Sweeps complete");
        } else {
            finish_with_warning(progress.bar(), "Sweeps complete with failures");
        }
        for failed in &report.failed_sweeps {
            print_warning(&format!("Sweep {} skipped: {}", failed.sweep, failed.error));
        }
        print_count(
            "principal feature(s) in the consensus",
            report.pf_from_intersection.len(),
            Some(&format!("(seed {})", report.seed)),
        );
        print_step_time(step_start.elapsed());
    }

    // Step 3: Report
    let input_file = cli.input.display().to_string();
    let params = ExportParams {
        input_file: &input_file,
        layout: cli.layout,
        output_columns: &cli.output_columns,
    };
    export_analysis(&report, &dataset, &config, &params, &report_path)?;

    if quiet {
        let names: Vec<&str> = report
            .pf_from_intersection
            .iter()
            .map(|&i| dataset.name(i))
            .collect();
        println!("{}", names.join(","));
        return Ok(());
    }

    ConsensusSummary::from_report(&report, &dataset, config.number_output_functions).display();
    println!();
    if report.pf_from_intersection.is_empty() {
        print_info("No feature depends on the outputs at this significance level");
    }
    print_success(&format!("Report saved to {}", report_path.display()));
    print_completion();

    Ok(())
}
