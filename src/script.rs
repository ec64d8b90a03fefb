use std::path::Path;

use crate::types::Operation;

/// Identifier outside the valid id range of every configured dataset, so a
/// point lookup never hits and the SUT walks its full search path.
const MISSING_ID: &str = "9999999";

/// Build the full stdin script for one benchmark execution.
///
/// Deterministic and side-effect-free. Every script opens the dataset file,
/// runs exactly one operation and ends with `EXIT`, so the SUT terminates
/// on its own once the workload completes. The SUT reads these lines
/// positionally; order and literal tokens are significant.
pub fn generate(operation: Operation, data_file: &Path) -> String {
    let mut lines = vec!["OPEN".to_string(), data_file.display().to_string()];

    let body: &[&str] = match operation {
        Operation::ShowAll => &["SHOW ALL"],
        Operation::QueryWorstCase => &["QUERY", MISSING_ID],
        // field 2 = mark, A = ascending
        Operation::SortByFieldAscending => &["SORT", "2", "A"],
        // id filter on, mark filter on, course filter; "A" = all must
        // match; course prefix CS; comparison 1 = ">="; mark threshold 60
        Operation::AdvancedQueryThreeFilters => &[
            "ADV QUERY",
            "1",
            "Y",
            "2",
            "Y",
            "3",
            "A",
            "CS",
            "1",
            "60",
        ],
    };
    lines.extend(body.iter().map(|line| line.to_string()));

    lines.push("EXIT".to_string());
    lines.join("\n") + "\n"
}
