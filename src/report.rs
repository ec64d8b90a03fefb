use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use crate::errors::CmsBenchError;
use crate::types::{BenchmarkResult, Operation, ScalingSummary};

/// Elapsed times are rendered with this many decimal places everywhere.
pub const DECIMAL_PRECISION: usize = 6;

/// One line of the persisted CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub dataset: u64,
    pub operation: &'static str,
    pub time_s: String,
}

/// Successful results only, in execution order. Failed executions are
/// excluded here so they cannot silently skew downstream analysis.
pub fn report_rows(results: &[BenchmarkResult]) -> Vec<ReportRow> {
    results
        .iter()
        .filter(|r| r.success)
        .map(|r| ReportRow {
            dataset: r.dataset_size,
            operation: r.operation.label(),
            time_s: format!("{:.*}", DECIMAL_PRECISION, r.elapsed_seconds),
        })
        .collect()
}

/// Write the CSV report (`dataset,operation,time_s` header plus one row per
/// successful execution). Returns the number of rows written.
pub fn write_csv(path: &Path, results: &[BenchmarkResult]) -> Result<usize, CmsBenchError> {
    let wrap = |source: csv::Error| CmsBenchError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let rows = report_rows(results);
    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    writer
        .write_record(["dataset", "operation", "time_s"])
        .map_err(wrap)?;
    for row in &rows {
        writer
            .write_record([row.dataset.to_string().as_str(), row.operation, &row.time_s])
            .map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(csv::Error::from(e)))?;
    Ok(rows.len())
}

/// Per-operation view over the successful results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub operation: Operation,
    /// (dataset size, elapsed seconds), sorted by dataset size ascending.
    pub timings: Vec<(u64, f64)>,
    pub scaling: Option<ScalingSummary>,
}

/// Group successful results by operation and derive the scaling figures.
///
/// Pure over the input. Groups are ordered lexicographically by operation
/// label, independent of execution order, so repeated runs summarise
/// identically even when dataset availability varies.
pub fn summarize(results: &[BenchmarkResult]) -> Vec<OperationSummary> {
    let mut groups: Vec<(Operation, Vec<(u64, f64)>)> = Vec::new();
    for result in results.iter().filter(|r| r.success) {
        let timing = (result.dataset_size, result.elapsed_seconds);
        match groups.iter_mut().find(|(op, _)| *op == result.operation) {
            Some((_, timings)) => timings.push(timing),
            None => groups.push((result.operation, vec![timing])),
        }
    }
    groups.sort_by_key(|(op, _)| op.label());

    groups
        .into_iter()
        .map(|(operation, mut timings)| {
            timings.sort_by_key(|&(size, _)| size);
            let scaling = compute_scaling(&timings);
            OperationSummary {
                operation,
                timings,
                scaling,
            }
        })
        .collect()
}

/// Defined only for groups with at least two timings whose smallest time
/// is strictly positive.
fn compute_scaling(timings: &[(u64, f64)]) -> Option<ScalingSummary> {
    if timings.len() < 2 {
        return None;
    }
    let (first_size, first_time) = timings[0];
    let (last_size, last_time) = timings[timings.len() - 1];
    if first_time <= 0.0 {
        return None;
    }
    Some(ScalingSummary {
        size_ratio: last_size as f64 / first_size as f64,
        time_ratio: last_time / first_time,
    })
}

fn style_operation() -> Style {
    Style::new().cyan().bold()
}

/// Console rendering of the per-operation summaries.
pub fn format_summary(summaries: &[OperationSummary]) -> String {
    if summaries.is_empty() {
        return "no benchmark results to summarise.\n".to_string();
    }

    let op_style = style_operation();
    let mut out = String::new();

    out.push_str("\nbenchmark summary\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');

    for summary in summaries {
        let heading = summary
            .operation
            .label()
            .if_supports_color(Stream::Stdout, |s| s.style(op_style))
            .to_string();
        out.push_str(&format!("\n{heading}:\n"));

        for &(size, secs) in &summary.timings {
            out.push_str(&format!(
                "  {:>4} records: {:.*}s\n",
                size, DECIMAL_PRECISION, secs
            ));
        }

        if let Some(scaling) = summary.scaling {
            let line = format!(
                "  scaling: {:.1}x data -> {:.2}x time",
                scaling.size_ratio, scaling.time_ratio
            );
            out.push_str(
                &line
                    .if_supports_color(Stream::Stdout, |s| s.dimmed())
                    .to_string(),
            );
            out.push('\n');
        }
    }

    out
}

/// JSON output format (`--json`).
#[derive(Serialize)]
struct JsonReport<'a> {
    started_at: String,
    total: usize,
    successful: usize,
    failed: usize,
    results: &'a [BenchmarkResult],
}

pub fn format_json(results: &[BenchmarkResult], started_at: DateTime<Utc>) -> String {
    let successful = results.iter().filter(|r| r.success).count();
    let report = JsonReport {
        started_at: started_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        total: results.len(),
        successful,
        failed: results.len() - successful,
        results,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(
        dataset_size: u64,
        operation: Operation,
        elapsed_seconds: f64,
        success: bool,
    ) -> BenchmarkResult {
        BenchmarkResult {
            dataset_size,
            operation,
            elapsed_seconds,
            success,
            error_message: if success {
                None
            } else {
                Some("process returned exit code 1".to_string())
            },
        }
    }

    // --- report_rows / write_csv ---

    #[test]
    fn rows_contain_only_successes() {
        let results = vec![
            result(100, Operation::ShowAll, 0.001, true),
            result(100, Operation::QueryWorstCase, 0.0, false),
            result(500, Operation::ShowAll, 0.005, true),
        ];

        let rows = report_rows(&results);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows.len(),
            results.iter().filter(|r| r.success).count()
        );
        assert_eq!(rows[0].dataset, 100);
        assert_eq!(rows[1].dataset, 500);
    }

    #[test]
    fn rows_render_six_decimal_places() {
        let results = vec![result(100, Operation::ShowAll, 0.5, true)];
        let rows = report_rows(&results);
        assert_eq!(rows[0].time_s, "0.500000");
    }

    #[test]
    fn rows_preserve_execution_order() {
        let results = vec![
            result(100, Operation::SortByFieldAscending, 0.002, true),
            result(100, Operation::ShowAll, 0.001, true),
            result(500, Operation::ShowAll, 0.004, true),
        ];
        let rows = report_rows(&results);
        assert_eq!(rows[0].operation, "SORT_MARK_ASC");
        assert_eq!(rows[1].operation, "SHOW_ALL");
        assert_eq!(rows[2].operation, "SHOW_ALL");
    }

    #[test]
    fn csv_has_header_and_success_rows() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let path = tmp.path().join("perf-results.csv");
        let results = vec![
            result(100, Operation::ShowAll, 0.001234, true),
            result(100, Operation::QueryWorstCase, 60.0, false),
        ];

        let written = write_csv(&path, &results).unwrap();
        assert_eq!(written, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "dataset,operation,time_s");
        assert_eq!(lines[1], "100,SHOW_ALL,0.001234");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn csv_with_no_successes_is_header_only() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let path = tmp.path().join("perf-results.csv");
        let results = vec![result(100, Operation::ShowAll, 0.0, false)];

        let written = write_csv(&path, &results).unwrap();
        assert_eq!(written, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "dataset,operation,time_s");
    }

    #[test]
    fn csv_write_failure_is_report_error() {
        let results = vec![result(100, Operation::ShowAll, 0.001, true)];
        let err = write_csv(Path::new("/nonexistent/dir/out.csv"), &results).unwrap_err();
        assert!(err.to_string().contains("failed to write results"));
    }

    // --- summarize ---

    #[test]
    fn scaling_ratios_for_spec_example() {
        // 100 records in 0.002s, 1000 records in 0.040s
        let results = vec![
            result(100, Operation::ShowAll, 0.002, true),
            result(1000, Operation::ShowAll, 0.040, true),
        ];

        let summaries = summarize(&results);
        assert_eq!(summaries.len(), 1);
        let scaling = summaries[0].scaling.unwrap();
        assert_eq!(scaling.size_ratio, 10.0);
        assert_eq!(scaling.time_ratio, 20.0);
    }

    #[test]
    fn single_timing_has_no_scaling_figure() {
        let results = vec![result(100, Operation::ShowAll, 0.002, true)];
        let summaries = summarize(&results);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].scaling.is_none());
    }

    #[test]
    fn zero_smallest_time_has_no_scaling_figure() {
        let results = vec![
            result(100, Operation::ShowAll, 0.0, true),
            result(1000, Operation::ShowAll, 0.040, true),
        ];
        let summaries = summarize(&results);
        assert!(summaries[0].scaling.is_none());
    }

    #[test]
    fn groups_ordered_lexicographically_by_label() {
        // Execution order differs from lexicographic label order.
        let results = vec![
            result(100, Operation::SortByFieldAscending, 0.003, true),
            result(100, Operation::ShowAll, 0.001, true),
            result(100, Operation::QueryWorstCase, 0.002, true),
            result(100, Operation::AdvancedQueryThreeFilters, 0.004, true),
        ];

        let labels: Vec<&str> = summarize(&results)
            .iter()
            .map(|s| s.operation.label())
            .collect();
        assert_eq!(
            labels,
            vec!["ADV_QUERY_3_FILTERS", "QUERY_WORST", "SHOW_ALL", "SORT_MARK_ASC"]
        );
    }

    #[test]
    fn timings_sorted_by_size_within_group() {
        let results = vec![
            result(1000, Operation::ShowAll, 0.040, true),
            result(100, Operation::ShowAll, 0.002, true),
            result(500, Operation::ShowAll, 0.015, true),
        ];

        let summaries = summarize(&results);
        let sizes: Vec<u64> = summaries[0].timings.iter().map(|&(s, _)| s).collect();
        assert_eq!(sizes, vec![100, 500, 1000]);
    }

    #[test]
    fn failures_excluded_from_summary() {
        let results = vec![
            result(100, Operation::ShowAll, 0.002, true),
            result(500, Operation::ShowAll, 60.0, false),
        ];
        let summaries = summarize(&results);
        assert_eq!(summaries[0].timings.len(), 1);
    }

    #[test]
    fn summarize_is_idempotent_over_its_input() {
        let results = vec![
            result(100, Operation::ShowAll, 0.002, true),
            result(1000, Operation::ShowAll, 0.040, true),
            result(100, Operation::QueryWorstCase, 0.001, true),
        ];

        let first = summarize(&results);
        let second = summarize(&results);
        assert_eq!(first, second);
    }

    // --- format_summary / format_json ---

    #[test]
    fn empty_summary_message() {
        assert_eq!(format_summary(&[]), "no benchmark results to summarise.\n");
    }

    #[test]
    fn summary_lists_timings_and_scaling() {
        let results = vec![
            result(100, Operation::ShowAll, 0.002, true),
            result(1000, Operation::ShowAll, 0.040, true),
        ];
        let out = format_summary(&summarize(&results));

        assert!(out.contains("benchmark summary"));
        assert!(out.contains("SHOW_ALL:"));
        assert!(out.contains(" 100 records: 0.002000s"));
        assert!(out.contains("1000 records: 0.040000s"));
        assert!(out.contains("scaling: 10.0x data -> 20.00x time"));
    }

    #[test]
    fn json_report_counts_and_fields() {
        let results = vec![
            result(100, Operation::ShowAll, 0.002, true),
            result(100, Operation::QueryWorstCase, 0.0, false),
        ];
        let now = DateTime::parse_from_rfc3339("2026-02-18T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let out = format_json(&results, now);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["total"], 2);
        assert_eq!(parsed["successful"], 1);
        assert_eq!(parsed["failed"], 1);
        assert_eq!(parsed["started_at"], "2026-02-18T00:00:00Z");
        assert_eq!(parsed["results"][0]["operation"], "SHOW_ALL");
        assert_eq!(parsed["results"][1]["success"], false);
        assert!(parsed["results"][1]["error_message"].is_string());
    }
}
