//! JSON export of analysis results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{Dataset, Layout, PfaConfig, PfaReport};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    pub parpfa_version: String,
    pub input_file: String,
    pub layout: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_columns: Vec<String>,
    pub config: PfaConfig,
}

/// Summary statistics of the analysis
#[derive(Serialize)]
pub struct AnalysisSummary {
    pub total_rows: usize,
    pub outputs: usize,
    pub candidate_features: usize,
    pub data_points: usize,
    pub consensus_size: usize,
    /// Names of the consensus features, in ascending index order
    pub consensus_features: Vec<String>,
    pub sweeps_run: usize,
    pub sweeps_failed: usize,
}

/// Complete analysis export with metadata
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    pub summary: AnalysisSummary,
    pub result: &'a PfaReport,
}

/// Parameters describing where the data came from
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub layout: Layout,
    pub output_columns: &'a [String],
}

/// Assemble the export document for `report`
pub fn build_export<'a>(
    report: &'a PfaReport,
    dataset: &Dataset,
    config: &PfaConfig,
    params: &ExportParams,
) -> AnalysisExport<'a> {
    AnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            parpfa_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            layout: params.layout.as_str().to_string(),
            output_columns: params.output_columns.to_vec(),
            config: config.clone(),
        },
        summary: AnalysisSummary {
            total_rows: dataset.row_count(),
            outputs: config.number_output_functions,
            candidate_features: dataset
                .row_count()
                .saturating_sub(config.number_output_functions),
            data_points: dataset.point_count(),
            consensus_size: report.pf_from_intersection.len(),
            consensus_features: report
                .pf_from_intersection
                .iter()
                .map(|&i| dataset.name(i).to_string())
                .collect(),
            sweeps_run: report.sweep_history.len(),
            sweeps_failed: report.failed_sweeps.len(),
        },
        result: report,
    }
}

/// Export analysis results to a JSON file with metadata
pub fn export_analysis(
    report: &PfaReport,
    dataset: &Dataset,
    config: &PfaConfig,
    params: &ExportParams,
    output_path: &Path,
) -> Result<()> {
    let export = build_export(report, dataset, config, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Cluster, FailedSweep, PrincipalFeatures, SweepRecord};
    use tempfile::TempDir;

    fn fixture() -> (PfaReport, Dataset) {
        let dataset = Dataset::with_names(
            vec![vec![0.0, 1.0]; 3],
            vec!["y".into(), "a".into(), "b".into()],
        )
        .unwrap();
        let report = PfaReport {
            pf_from_intersection: vec![2],
            sweep_history: vec![SweepRecord {
                sweep: 1,
                pf: vec![Cluster::new(vec![1]), Cluster::new(vec![2])],
                pf_ds: vec![PrincipalFeatures::None, PrincipalFeatures::Features(vec![2])],
                global_indices_and_principal_features_state_dependency: Vec::new(),
                sample_size: 2,
                edge_count: 1,
            }],
            failed_sweeps: vec![FailedSweep {
                sweep: 2,
                error: "boom".into(),
            }],
            list_data_frame_feature_mutual_information: None,
            seed: 42,
        };
        (report, dataset)
    }

    #[test]
    fn test_export_writes_json_document() {
        let (report, dataset) = fixture();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        let params = ExportParams {
            input_file: "data.csv",
            layout: Layout::Columns,
            output_columns: &[],
        };

        export_analysis(&report, &dataset, &PfaConfig::default(), &params, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["metadata"]["input_file"], "data.csv");
        assert_eq!(json["metadata"]["layout"], "columns");
        assert!(json["metadata"].get("output_columns").is_none());
        assert_eq!(json["metadata"]["config"]["cluster_size"], 50);
        assert_eq!(json["summary"]["consensus_features"][0], "b");
        assert_eq!(json["summary"]["sweeps_failed"], 1);
        assert_eq!(json["result"]["pf_from_intersection"][0], 2);
        assert_eq!(json["result"]["sweep_history"][0]["pf_ds"][0], "none");
        assert_eq!(json["result"]["sweep_history"][0]["pf_ds"][1]["features"][0], 2);
        assert!(json["result"]["list_data_frame_feature_mutual_information"].is_null());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let (report, dataset) = fixture();
        let params = ExportParams {
            input_file: "data.csv",
            layout: Layout::Rows,
            output_columns: &[],
        };
        let result = export_analysis(
            &report,
            &dataset,
            &PfaConfig::default(),
            &params,
            Path::new("/nonexistent/dir/report.json"),
        );
        assert!(result.is_err());
    }
}
