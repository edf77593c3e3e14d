// src/runner.rs
use crate::errors::{PlaygroundError, Result};
use crate::invocation::Invocation;
use crate::models::VerificationResponse;
use crate::parser;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Terminal state of one verifier process.
#[derive(Debug)]
pub enum RunOutcome {
    Exited {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        elapsed: Duration,
    },
    /// Killed after exceeding `limit`.
    TimedOut { limit: Duration },
}

type CaptureTask = JoinHandle<std::io::Result<Vec<u8>>>;

/// Start the verifier and wait for it to exit or for `limit` to pass,
/// whichever comes first. A timed out process is killed before returning.
pub async fn execute(invocation: &Invocation, limit: Duration) -> Result<RunOutcome> {
    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            PlaygroundError::ProcessFailure(format!(
                "failed to start {}: {}",
                invocation.program.display(),
                e
            ))
        })?;
    let start = Instant::now();

    let mut stdout_task = capture(child.stdout.take())?;
    let mut stderr_task = capture(child.stderr.take())?;

    tokio::select! {
        finished = wait_and_collect(&mut child, &mut stdout_task, &mut stderr_task) => {
            let (status, stdout, stderr) = finished?;
            Ok(RunOutcome::Exited { status, stdout, stderr, elapsed: start.elapsed() })
        }
        _ = tokio::time::sleep(limit) => {
            child.kill().await.map_err(|e| {
                PlaygroundError::ProcessFailure(format!("failed to kill timed out verifier: {}", e))
            })?;
            stdout_task.abort();
            stderr_task.abort();
            Ok(RunOutcome::TimedOut { limit })
        }
    }
}

fn capture<R>(stream: Option<R>) -> Result<CaptureTask>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut stream = stream.ok_or_else(|| {
        PlaygroundError::ProcessFailure("verifier output stream was not piped".to_string())
    })?;
    Ok(tokio::spawn(async move {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(buf)
    }))
}

async fn wait_and_collect(
    child: &mut Child,
    stdout_task: &mut CaptureTask,
    stderr_task: &mut CaptureTask,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let status = child.wait().await?;
    let stdout = join_capture(stdout_task, "stdout").await?;
    let stderr = join_capture(stderr_task, "stderr").await?;
    Ok((status, stdout, stderr))
}

async fn join_capture(task: &mut CaptureTask, name: &str) -> Result<Vec<u8>> {
    match task.await {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(e)) => Err(PlaygroundError::ProcessFailure(format!("failed to read verifier {}: {}", name, e))),
        Err(e) => Err(PlaygroundError::ProcessFailure(format!("{} capture task failed: {}", name, e))),
    }
}

/// Turn a run outcome into the response sent to the client: parse stdout,
/// attach the stats file and the elapsed time.
pub async fn reconcile(run_id: &str, invocation: &Invocation, outcome: RunOutcome) -> Result<VerificationResponse> {
    let (status, stdout, stderr, elapsed) = match outcome {
        RunOutcome::TimedOut { limit } => {
            log::warn!("[{}] verifier timed out after {}s", run_id, limit.as_secs_f64());
            return Ok(VerificationResponse::timed_out(limit));
        }
        RunOutcome::Exited { status, stdout, stderr, elapsed } => (status, stdout, stderr, elapsed),
    };

    let stdout = parser::decode_output(&stdout);
    log::debug!("[{}] stdout:\n{}", run_id, stdout);
    log::debug!("[{}] stderr:\n{}", run_id, parser::decode_output(&stderr));

    if !status.success() {
        log::warn!("[{}] verifier exited with {}", run_id, status);
    }

    let raw_stats = tokio::fs::read(&invocation.stats_path).await.map_err(|e| {
        PlaygroundError::ProcessFailure(format!(
            "failed to read {}: {}",
            invocation.stats_path.display(),
            e
        ))
    })?;
    let stats: serde_json::Value = serde_json::from_slice(&raw_stats).map_err(|e| {
        PlaygroundError::ProcessFailure(format!("stats file is not valid JSON: {}", e))
    })?;

    let response = parser::parse_output(&stdout)?;
    log::info!(
        "[{}] verified={} errors={} in {:.2}s",
        run_id,
        response.verified,
        response.errors.len(),
        elapsed.as_secs_f64()
    );

    Ok(response.with_run_data(elapsed, stats))
}
