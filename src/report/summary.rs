//! Consensus summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{Dataset, PfaReport};

/// One consensus feature as shown in the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusEntry {
    pub index: usize,
    pub name: String,
    /// Smallest output p-value seen across all sweeps
    pub best_p_value: Option<f64>,
    /// Name of the output that produced `best_p_value`
    pub strongest_output: Option<String>,
    /// Mutual information with every output, when scored
    pub mutual_information: Vec<f64>,
}

/// Summary of a principal feature analysis run
#[derive(Debug, Default)]
pub struct ConsensusSummary {
    pub rows: usize,
    pub features: usize,
    pub data_points: usize,
    pub sweeps_run: usize,
    pub sweeps_failed: usize,
    pub output_names: Vec<String>,
    pub consensus: Vec<ConsensusEntry>,
}

impl ConsensusSummary {
    pub fn from_report(
        report: &PfaReport,
        dataset: &Dataset,
        number_output_functions: usize,
    ) -> Self {
        let output_names: Vec<String> = dataset.names()[..number_output_functions].to_vec();

        let consensus = report
            .pf_from_intersection
            .iter()
            .map(|&index| {
                let best = report
                    .sweep_history
                    .iter()
                    .flat_map(|r| &r.global_indices_and_principal_features_state_dependency)
                    .filter(|record| record.index == index)
                    .min_by(|a, b| a.p_value.total_cmp(&b.p_value));

                let mutual_information = report
                    .list_data_frame_feature_mutual_information
                    .iter()
                    .flatten()
                    .filter_map(|table| table.get(index))
                    .collect();

                ConsensusEntry {
                    index,
                    name: dataset.name(index).to_string(),
                    best_p_value: best.map(|r| r.p_value),
                    strongest_output: best.map(|r| dataset.name(r.output).to_string()),
                    mutual_information,
                }
            })
            .collect();

        Self {
            rows: dataset.row_count(),
            features: dataset.row_count() - number_output_functions,
            data_points: dataset.point_count(),
            sweeps_run: report.sweep_history.len(),
            sweeps_failed: report.failed_sweeps.len(),
            output_names,
            consensus,
        }
    }

    /// Fraction of candidate features kept in the consensus
    pub fn retention(&self) -> f64 {
        if self.features == 0 {
            0.0
        } else {
            self.consensus.len() as f64 / self.features as f64
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Candidate Features"), Cell::new(self.features)]);
        table.add_row(vec![Cell::new("🎯 Outputs"), Cell::new(self.output_names.len())]);
        table.add_row(vec![Cell::new("📏 Data Points"), Cell::new(self.data_points)]);
        table.add_row(vec![Cell::new("🔁 Sweeps Completed"), Cell::new(self.sweeps_run)]);
        table.add_row(vec![
            Cell::new("⚠️  Sweeps Failed"),
            Cell::new(self.sweeps_failed).fg(if self.sweeps_failed == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Principal Features"),
            Cell::new(self.consensus.len())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("📉 Retained"),
            Cell::new(format!("{:.1}%", self.retention() * 100.0)).fg(Color::Cyan),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if self.consensus.is_empty() {
            return;
        }

        println!();
        println!(
            "    {} {}",
            style("📝").cyan(),
            style("PRINCIPAL FEATURES").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let with_mi = self.consensus.iter().any(|e| !e.mutual_information.is_empty());
        let mut header = vec![
            Cell::new("Index").add_attribute(Attribute::Bold),
            Cell::new("Feature").add_attribute(Attribute::Bold),
            Cell::new("Best p-value").add_attribute(Attribute::Bold),
            Cell::new("Output").add_attribute(Attribute::Bold),
        ];
        if with_mi {
            header.extend(
                self.output_names
                    .iter()
                    .map(|name| Cell::new(format!("MI({})", name)).add_attribute(Attribute::Bold)),
            );
        }

        let mut features = Table::new();
        features.load_preset(UTF8_FULL_CONDENSED);
        features.set_header(header);
        for entry in &self.consensus {
            let mut row = vec![
                Cell::new(entry.index),
                Cell::new(&entry.name).fg(Color::Green),
                Cell::new(
                    entry
                        .best_p_value
                        .map(|p| format!("{:.3e}", p))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(entry.strongest_output.as_deref().unwrap_or("-")),
            ];
            if with_mi {
                row.extend(
                    entry
                        .mutual_information
                        .iter()
                        .map(|mi| Cell::new(format!("{:.4}", mi))),
                );
            }
            features.add_row(row);
        }

        for line in features.to_string().lines() {
            println!("    {}", line);
        }
    }
}
