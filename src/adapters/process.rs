//! Subprocess execution for the Java and Python backends

use crate::domain::{BackendError, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Run `command`, feed it `input` on stdin and collect stdout
///
/// The child is killed if the timeout elapses or the future is dropped.
///
/// # Errors
///
/// - [`BackendError::ProcessFailed`] if the process cannot start or exits
///   non-zero (stderr is included)
/// - [`BackendError::Timeout`] if it runs longer than `timeout`
/// - [`BackendError::InvalidResponse`] if stdout is not UTF-8
pub async fn run_process(
    mut command: Command,
    input: Option<&[u8]>,
    timeout: Duration,
    program: &str,
) -> Result<String> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let started = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        BackendError::ProcessFailed(format!("Failed to start {program}: {e}"))
    })?;
    let stdin = child.stdin.take();

    let write_input = async move {
        if let (Some(mut stdin), Some(input)) = (stdin, input) {
            stdin.write_all(input).await?;
            stdin.shutdown().await?;
        }
        Ok::<_, std::io::Error>(())
    };

    let (written, output) =
        match tokio::time::timeout(timeout, async { tokio::join!(write_input, child.wait_with_output()) })
            .await
        {
            Ok(result) => result,
            Err(_) => {
                return Err(BackendError::Timeout(format!(
                    "{program} did not finish within {}s",
                    timeout.as_secs()
                ))
                .into())
            }
        };

    let output = output
        .map_err(|e| BackendError::ProcessFailed(format!("Failed to wait for {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BackendError::ProcessFailed(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        ))
        .into());
    }

    if let Err(e) = written {
        // a successful exit without reading all input is unusual but harmless
        tracing::debug!(program = program, error = %e, "Could not write full input to process");
    }

    tracing::debug!(
        program = program,
        duration_ms = started.elapsed().as_millis() as u64,
        stdout_bytes = output.stdout.len(),
        "Process completed"
    );

    String::from_utf8(output.stdout).map_err(|e| {
        BackendError::InvalidResponse(format!("{program} wrote non UTF-8 output: {e}")).into()
    })
}
