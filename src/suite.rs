use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::BenchConfig;
use crate::errors::CmsBenchError;
use crate::executor;
use crate::script;
use crate::types::{BenchmarkResult, Operation};

/// Fatal checks that must pass before any benchmark executes.
pub fn validate_environment(config: &BenchConfig) -> Result<(), CmsBenchError> {
    if !config.executable.exists() {
        return Err(CmsBenchError::ExecutableNotFound {
            path: config.executable.clone(),
        });
    }
    if !is_executable(&config.executable) {
        return Err(CmsBenchError::ExecutableNotExecutable {
            path: config.executable.clone(),
        });
    }
    if !config.data_dir.is_dir() {
        return Err(CmsBenchError::DataDirNotFound {
            path: config.data_dir.clone(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve the data file for a dataset size per the fixed naming convention.
pub fn data_file_path(data_dir: &Path, record_count: u64) -> PathBuf {
    data_dir.join(format!("{record_count}-records.txt"))
}

/// An invalid data file must produce no result rows at all for its size,
/// only warnings, so it cannot masquerade as a set of failed executions.
fn validate_data_file(data_file: &Path, record_count: u64) -> bool {
    if !data_file.exists() {
        eprintln!("warning: data file not found: {}", data_file.display());
        eprintln!("skipping all benchmarks for {record_count}-record dataset");
        return false;
    }
    if !data_file.is_file() {
        eprintln!("warning: {} is not a regular file", data_file.display());
        return false;
    }
    if std::fs::File::open(data_file).is_err() {
        eprintln!("warning: {} is not readable", data_file.display());
        return false;
    }
    true
}

/// Run every (dataset size, operation) pair strictly sequentially: exactly
/// one SUT process at a time, so concurrent instances cannot contend for
/// shared resources and skew timings.
///
/// Results are appended in execution order (size outer, operation inner).
/// Failed executions are recorded, never dropped. When `show_progress` is
/// set, a one-line update is printed per execution.
pub fn run_suite(config: &BenchConfig, show_progress: bool) -> Vec<BenchmarkResult> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut results = Vec::new();

    for &record_count in &config.dataset_sizes {
        let data_file = data_file_path(&config.data_dir, record_count);
        if !validate_data_file(&data_file, record_count) {
            continue;
        }

        if show_progress {
            println!("benchmarking {record_count}-record dataset...");
        }

        for operation in Operation::ALL {
            let input = script::generate(operation, &data_file);
            let result =
                executor::execute(&config.executable, record_count, operation, &input, timeout);

            if show_progress {
                if result.success {
                    println!("  {}: {:.6}s", operation, result.elapsed_seconds);
                } else {
                    eprintln!(
                        "  {}: failed - {}",
                        operation,
                        result.error_message.as_deref().unwrap_or("unknown error")
                    );
                }
            }

            results.push(result);
        }

        if show_progress {
            println!();
        }
    }

    results
}
