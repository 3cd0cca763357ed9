// Process execution — runs a built Invocation against the filter executable
// and produces one RawOutcome per attempt.
//
// Two paths share the invocation contract and differ only in lifecycle
// management: the blocking path suspends the calling thread and polls the
// child against a deadline; the concurrent path hands back a future and
// relies on kill_on_drop so an abandoned or timed-out check never leaks the
// process. Both drain stdout/stderr fully — the filter may emit arbitrarily
// long output and a full pipe must not deadlock the child.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;

use super::invocation::Invocation;

/// Unprocessed result of one execution attempt, prior to interpretation.
#[derive(Debug, Clone)]
pub struct RawOutcome {
    /// Exit code. None when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run the invocation, suspending the calling thread until the process
/// exits or the deadline passes. Spawn failure and timeout are `Err`;
/// any completed process, whatever its exit code, is `Ok`.
pub fn run_blocking(
    executable: &Path,
    invocation: &Invocation,
    timeout: Duration,
) -> Result<RawOutcome> {
    let args = invocation.args();
    debug!(executable = %executable.display(), "spawning filter (blocking)");

    let mut child = Command::new(executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn filter at {}", executable.display()))?;

    // Pipes are drained on their own threads while we poll for exit, so a
    // chatty child can never fill a pipe and stall.
    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let status = wait_with_deadline(&mut child, timeout);

    let stdout = join_drain(stdout_reader);
    let stderr = join_drain(stderr_reader);

    let status = status.with_context(|| {
        format!("filter timed out after {}s", timeout.as_secs_f64())
    })?;

    Ok(RawOutcome {
        status,
        stdout,
        stderr,
    })
}

/// Run the invocation without blocking the caller. The returned future
/// resolves when the process exits; dropping it kills the child.
pub async fn run_async(
    executable: &Path,
    invocation: &Invocation,
    timeout: Duration,
) -> Result<RawOutcome> {
    let args = invocation.args();
    debug!(executable = %executable.display(), "spawning filter (async)");

    let child = tokio::process::Command::new(executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn filter at {}", executable.display()))?;

    // wait_with_output drains both pipes incrementally and closes them on
    // every path. If the timeout fires, dropping the child kills the process.
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            anyhow::anyhow!("filter timed out after {}s", timeout.as_secs_f64())
        })?
        .context("failed to collect filter output")?;

    Ok(RawOutcome {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Spawn a thread that reads a pipe to EOF.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut r| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = r.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Poll the child until it exits or the deadline passes. Returns
/// `Some(exit_code)` when the process finished; `None` on timeout, with
/// the child killed and reaped.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Option<Option<i32>> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status.code()),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                thread::sleep(poll_interval);
            }
            Err(_) => {
                // Treat a wait error like a timeout: reap and report failure.
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }
}
