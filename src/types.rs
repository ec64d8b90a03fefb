use serde::Serialize;

/// One benchmark scenario, driven through the SUT's stdin command protocol.
///
/// The set is closed on purpose: `script::generate` matches exhaustively,
/// so adding a variant without a script is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    #[serde(rename = "SHOW_ALL")]
    ShowAll,
    #[serde(rename = "QUERY_WORST")]
    QueryWorstCase,
    #[serde(rename = "SORT_MARK_ASC")]
    SortByFieldAscending,
    #[serde(rename = "ADV_QUERY_3_FILTERS")]
    AdvancedQueryThreeFilters,
}

impl Operation {
    /// Fixed execution order within each dataset size.
    pub const ALL: [Operation; 4] = [
        Operation::ShowAll,
        Operation::QueryWorstCase,
        Operation::SortByFieldAscending,
        Operation::AdvancedQueryThreeFilters,
    ];

    /// Stable label used in the CSV report, JSON output and console lines.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ShowAll => "SHOW_ALL",
            Operation::QueryWorstCase => "QUERY_WORST",
            Operation::SortByFieldAscending => "SORT_MARK_ASC",
            Operation::AdvancedQueryThreeFilters => "ADV_QUERY_3_FILTERS",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One measured execution of an operation against a dataset size.
///
/// `error_message` is `Some` iff the execution failed. On timeout the
/// elapsed time is clamped to the configured bound rather than measured.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub dataset_size: u64,
    pub operation: Operation,
    pub elapsed_seconds: f64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Time growth relative to size growth between the smallest and largest
/// successfully benchmarked dataset sizes of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingSummary {
    pub size_ratio: f64,
    pub time_ratio: f64,
}
