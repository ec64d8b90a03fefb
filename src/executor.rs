use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::types::{BenchmarkResult, Operation};

/// How often the child is polled for exit while the timeout clock runs.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Owns the child for the duration of one execution. If a return path
/// forgets to reap it, `Drop` kills and waits so no zombie or open pipe
/// outlives the call.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        ChildGuard {
            child,
            reaped: false,
        }
    }

    fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        let status = self.child.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    fn kill_and_reap(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            self.kill_and_reap();
        }
    }
}

/// Run one scripted interaction against the SUT and classify the outcome.
///
/// The SUT is spawned with stdin piped (the whole script is written up
/// front), stdout discarded and stderr captured for diagnostics. Outcomes,
/// in priority order:
///
/// 1. timeout - child force-killed, elapsed clamped to the bound
/// 2. nonzero exit - measured elapsed, exit status + stderr in the message
/// 3. unexpected failure (spawn or script-write error) - elapsed zero
/// 4. success - zero exit within the bound, measured elapsed
///
/// Failures never propagate as errors; they are folded into a failed
/// `BenchmarkResult` so the suite can continue with the remaining cases.
pub fn execute(
    executable: &Path,
    record_count: u64,
    operation: Operation,
    script: &str,
    timeout: Duration,
) -> BenchmarkResult {
    let start = Instant::now();

    let spawned = Command::new(executable)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => ChildGuard::new(child),
        Err(e) => {
            return unexpected_failure(
                record_count,
                operation,
                format!("failed to spawn {}: {}", executable.display(), e),
            );
        }
    };

    // Drain stderr on its own thread so a chatty SUT cannot fill the pipe
    // and block before exiting.
    let stderr_reader = child.child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    // The script is tiny and the handle is dropped right after, so the SUT
    // sees EOF after EXIT even if it reads lazily.
    if let Some(mut stdin) = child.child.stdin.take()
        && let Err(e) = stdin.write_all(script.as_bytes())
    {
        child.kill_and_reap();
        return unexpected_failure(
            record_count,
            operation,
            format!("failed to write script to stdin: {e}"),
        );
    }

    let deadline = start + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    child.kill_and_reap();
                    let message = format!("execution timed out after {}s", timeout.as_secs_f64());
                    eprintln!("warning: {operation} - {message}");
                    return BenchmarkResult {
                        dataset_size: record_count,
                        operation,
                        // Clamped to the bound, not measured.
                        elapsed_seconds: timeout.as_secs_f64(),
                        success: false,
                        error_message: Some(message),
                    };
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                child.kill_and_reap();
                return unexpected_failure(
                    record_count,
                    operation,
                    format!("failed to wait for process: {e}"),
                );
            }
        }
    };
    let elapsed_seconds = start.elapsed().as_secs_f64();

    let stderr_text = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if !status.success() {
        let mut message = match status.code() {
            Some(code) => format!("process returned exit code {code}"),
            None => "process terminated by signal".to_string(),
        };
        let diagnostic = stderr_text.trim();
        if !diagnostic.is_empty() {
            message.push_str(": ");
            message.push_str(diagnostic);
        }
        eprintln!("warning: {operation} failed - {message}");
        return BenchmarkResult {
            dataset_size: record_count,
            operation,
            elapsed_seconds,
            success: false,
            error_message: Some(message),
        };
    }

    BenchmarkResult {
        dataset_size: record_count,
        operation,
        elapsed_seconds,
        success: true,
        error_message: None,
    }
}

/// Environment problem (spawn/I-O), not a SUT performance problem: flagged
/// with an `error:` prefix so operators can tell the two apart in logs.
fn unexpected_failure(record_count: u64, operation: Operation, message: String) -> BenchmarkResult {
    eprintln!("error: {operation} - {message}");
    BenchmarkResult {
        dataset_size: record_count,
        operation,
        elapsed_seconds: 0.0,
        success: false,
        error_message: Some(message),
    }
}
