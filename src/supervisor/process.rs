//! The supervision loop: child process, line pump, heartbeat.

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::{JoinError, JoinHandle};

use crate::classifier::{LifecycleEvent, classify};
use crate::config::{HeartbeatConfig, ServerConfig};
use crate::heartbeat::spawn_heartbeat;
use crate::lifecycle::{Flow, LifecycleController};
use crate::orchestration::{ControlPlane, OrchestrationError};
use crate::supervisor::error::{Result, SupervisorError};

/// How long to wait for `wait()` after the diagnostic stream reaches EOF.
///
/// When the child exits, its stderr closes and the exit notification lands
/// at nearly the same moment; the grace period distinguishes "stream closed
/// because the child exited" from a genuine pipe loss.
const EXIT_GRACE: Duration = Duration::from_millis(500);

/// Supervision phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// `run()` has not been called yet.
    NotStarted,
    /// Child spawned, line pump and heartbeat active.
    Running,
    /// The diagnostic stream ended while the child was still running.
    LineReadingFailed,
    /// The child exited and was reaped.
    ChildExited,
}

/// How a supervision run ended, absent a fatal error.
#[derive(Debug)]
pub enum ExitOutcome {
    /// The child exited on its own; the status is propagated as the
    /// sidecar's exit code.
    ChildExited(ExitStatus),
    /// The control plane acknowledged a shutdown request; clean exit.
    ShutdownRequested,
}

/// One resolved iteration of the supervision select loop.
enum Step {
    /// A line (or EOF, or a read error) from the diagnostic stream.
    Line(std::io::Result<Option<String>>),
    /// The child process exited.
    Exited(std::io::Result<ExitStatus>),
    /// The heartbeat task finished (error, or abnormal completion).
    HeartbeatEnded(std::result::Result<std::result::Result<(), OrchestrationError>, JoinError>),
}

/// Owns the game-server child process and drives the line-classification
/// pipeline and the heartbeat until one of them decides the sidecar's fate.
pub struct Supervisor {
    server: ServerConfig,
    heartbeat: HeartbeatConfig,
    control_plane: Arc<dyn ControlPlane>,
    controller: LifecycleController,
    state: SupervisorState,
}

impl Supervisor {
    /// Create a supervisor. Nothing is spawned until [`run`](Self::run).
    pub fn new(
        server: ServerConfig,
        heartbeat: HeartbeatConfig,
        control_plane: Arc<dyn ControlPlane>,
        player_tracking: bool,
    ) -> Self {
        let controller = LifecycleController::new(Arc::clone(&control_plane), player_tracking);
        Self {
            server,
            heartbeat,
            control_plane,
            controller,
            state: SupervisorState::NotStarted,
        }
    }

    /// Current supervision phase.
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Run until the child exits or a fatal lifecycle decision ends the
    /// sidecar first.
    ///
    /// The child is spawned exactly once and reaped exactly once. Fatal
    /// errors tear the child down best-effort before returning.
    pub async fn run(mut self) -> Result<ExitOutcome> {
        let mut child = self.spawn_child()?;
        self.state = SupervisorState::Running;

        let stderr = child
            .stderr
            .take()
            .ok_or(SupervisorError::StderrUnavailable)?;

        let mut heartbeat = spawn_heartbeat(&self.heartbeat, Arc::clone(&self.control_plane));

        let outcome = self.supervise(&mut child, stderr, &mut heartbeat).await;

        heartbeat.abort();
        if matches!(outcome, Err(_) | Ok(ExitOutcome::ShutdownRequested)) {
            // Best-effort teardown; the child may already be gone.
            let _ = child.start_kill();
        }
        outcome
    }

    fn spawn_child(&self) -> Result<Child> {
        tracing::info!(
            binary = %self.server.binary.display(),
            port = %self.server.port,
            "Starting game server"
        );

        Command::new(&self.server.binary)
            .args(&self.server.args)
            .arg("-p")
            .arg(&self.server.port)
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SupervisorError::SpawnFailed {
                binary: self.server.binary.display().to_string(),
                source: e,
            })
    }

    async fn supervise(
        &mut self,
        child: &mut Child,
        stderr: ChildStderr,
        heartbeat: &mut JoinHandle<std::result::Result<(), OrchestrationError>>,
    ) -> Result<ExitOutcome> {
        let mut reader = BufReader::new(stderr);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            // Resolve the select into a plain value first so the borrows
            // held by the competing futures are released before any
            // follow-up work on the child.
            let step = tokio::select! {
                // The heartbeat handle is only ready once the task has
                // failed, so polling it first keeps detection immediate
                // even while the child floods its output. The line arm
                // stays above child exit so lines emitted just before
                // exit are still classified.
                biased;

                result = &mut *heartbeat => Step::HeartbeatEnded(result),
                line = next_line_lossy(&mut reader, &mut buf) => Step::Line(line),
                status = child.wait() => Step::Exited(status),
            };

            match step {
                Step::Line(Ok(Some(line))) => {
                    if let Flow::Shutdown = self.dispatch(&line).await? {
                        return Ok(ExitOutcome::ShutdownRequested);
                    }
                }
                Step::Line(Ok(None)) => return self.on_stream_end(child).await,
                Step::Line(Err(e)) => {
                    self.state = SupervisorState::LineReadingFailed;
                    return Err(SupervisorError::LineRead(e));
                }
                Step::Exited(Ok(status)) => {
                    self.state = SupervisorState::ChildExited;
                    tracing::info!(%status, "Game server exited");
                    return Ok(ExitOutcome::ChildExited(status));
                }
                Step::Exited(Err(e)) => return Err(SupervisorError::WaitFailed(e)),
                Step::HeartbeatEnded(result) => {
                    return Err(match result {
                        Ok(Err(e)) => SupervisorError::HeartbeatFailed(e),
                        Ok(Ok(())) | Err(_) => SupervisorError::HeartbeatStopped,
                    });
                }
            }
        }
    }

    /// Echo, classify, and dispatch one line.
    async fn dispatch(&mut self, line: &str) -> Result<Flow> {
        // Raw passthrough for operator visibility, independent of
        // classification.
        println!("{line}");

        let event = classify(line);
        if event != LifecycleEvent::Unrecognized {
            tracing::debug!(raw = %line, event = ?event, "Classified server output");
        }

        Ok(self.controller.handle(event).await?)
    }

    /// The diagnostic stream reached EOF. If the child exits within the
    /// grace period this is a normal exit; otherwise the pipe was lost
    /// while the child is still alive, which is fatal.
    async fn on_stream_end(&mut self, child: &mut Child) -> Result<ExitOutcome> {
        match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                self.state = SupervisorState::ChildExited;
                tracing::info!(%status, "Game server exited");
                Ok(ExitOutcome::ChildExited(status))
            }
            Ok(Err(e)) => Err(SupervisorError::WaitFailed(e)),
            Err(_) => {
                self.state = SupervisorState::LineReadingFailed;
                tracing::error!("Game server output stream ended unexpectedly");
                Err(SupervisorError::OutputStreamEnded)
            }
        }
    }
}

/// Read the next line from the stream, decoding lossily.
///
/// Game servers are frequently C/C++ programs that can emit non-UTF8 bytes;
/// a strict `lines()` reader would abort the pump on the first bad byte.
/// `buf` carries partial reads across cancellations, so this is safe to use
/// inside `select!`.
async fn next_line_lossy(
    reader: &mut BufReader<impl AsyncRead + Unpin>,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    match reader.read_until(b'\n', buf).await? {
        0 if buf.is_empty() => Ok(None),
        _ => {
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            let line = String::from_utf8_lossy(buf).into_owned();
            buf.clear();
            Ok(Some(line))
        }
    }
}
