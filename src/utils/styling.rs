//! Terminal styling utilities for the command-line front end

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::{Layout, PfaConfig};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ┌─┐┌─┐┬─┐┌─┐┌─┐┌─┐
    ├─┘├─┤├┬┘├─┘├┤ ├─┤
    ┴  ┴ ┴┴└─┴  └  ┴ ┴
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Principal feature analysis over dependency graphs").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    input: &Path,
    outputs: &str,
    report: &Path,
    layout: Layout,
    config: &PfaConfig,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    let seed = config
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "random".to_string());

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:   {:<38}│", FOLDER, truncate_path(input, 37));
    println!("    │  {} Outputs: {:<38}│", TARGET, truncate_string(outputs, 37));
    println!("    │  {} Report:  {:<38}│", SAVE, truncate_path(report, 37));
    println!("    ├{}┤", line);
    print_setting(&CHART, "Alpha", format!("{}", config.alpha));
    print_setting(&CHART, "Min points per bin", config.min_n_datapoints_a_bin.to_string());
    print_setting(&LINK, "Cluster size", config.cluster_size.to_string());
    print_setting(&LINK, "Sweeps", config.number_sweeps.to_string());
    print_setting(&LINK, "Sample fraction", format!("{:.2}", config.frac));
    print_setting(&LINK, "Shuffle features", config.shuffle_feature_numbers.to_string());
    print_setting(&LINK, "Layout", layout.as_str().to_string());
    print_setting(&LINK, "Seed", seed);
    println!("    └{}┘", line);
    println!();
}

fn print_setting(icon: &Emoji<'_, '_>, label: &str, value: String) {
    println!(
        "    │  {} {:<19} {:<28}│",
        icon,
        format!("{}:", label),
        style(value).yellow()
    );
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("completed in {}", format_duration(elapsed))).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Principal feature analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Human-readable duration: milliseconds below a second, seconds below a
/// minute, minutes and seconds beyond
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", elapsed.as_millis())
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let total = elapsed.as_secs();
        format!("{}m {}s", total / 60, total % 60)
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
