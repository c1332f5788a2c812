use crate::error::ProcessError;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Maximum captured size per stream in bytes (1 MB).
const MAX_OUTPUT_BYTES: usize = 1_048_576;
/// Search path used when the inherited `PATH` is missing or empty.
pub const FALLBACK_PATH: &str = "/usr/local/bin:/usr/bin:/bin";
/// How long to wait for pipe readers after the child is gone.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Bytes collected from one pipe so far. Shared so an aborted reader loses nothing.
type Captured = Arc<Mutex<Vec<u8>>>;

/// One external command to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout,
            env: Vec::new(),
        }
    }

    /// Run `command_line` through `sh -c`.
    pub fn shell(command_line: impl Into<String>, timeout: Duration) -> Self {
        Self::new("sh", timeout).arg("-c").arg(command_line)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Human-readable rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

/// Runs external commands with a hard timeout and captured output.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub const fn new() -> Self {
        Self
    }

    pub async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        let started = Instant::now();
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        if !has_search_path(&invocation.env) {
            cmd.env("PATH", effective_path(std::env::var("PATH").ok()));
        }
        // Own process group, so a timeout can take down everything the child started.
        #[cfg(unix)]
        cmd.process_group(0);

        tracing::debug!(command = %invocation.display(), "process.spawn");
        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout_buf = Captured::default();
        let stderr_buf = Captured::default();
        let stdout_reader = spawn_reader(child.stdout.take(), Arc::clone(&stdout_buf));
        let stderr_reader = spawn_reader(child.stderr.take(), Arc::clone(&stderr_buf));

        let waited = tokio::time::timeout(invocation.timeout, child.wait()).await;
        let status = match waited {
            Ok(status) => status?,
            Err(_) => {
                kill_process_tree(&mut child, &invocation.program).await;
                let (stdout, stderr) = tokio::join!(
                    drain(stdout_reader, &stdout_buf),
                    drain(stderr_reader, &stderr_buf)
                );
                tracing::warn!(
                    command = %invocation.program,
                    timeout_ms = u64::try_from(invocation.timeout.as_millis()).unwrap_or(u64::MAX),
                    "process.timeout"
                );
                return Err(ProcessError::Timeout {
                    timeout: invocation.timeout,
                    stdout,
                    stderr,
                });
            }
        };

        let (stdout, stderr) = tokio::join!(
            drain(stdout_reader, &stdout_buf),
            drain(stderr_reader, &stderr_buf)
        );
        let duration = started.elapsed();
        let exit_code = status.code();

        tracing::debug!(
            command = %invocation.program,
            exit_code = ?exit_code,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "process.exit"
        );

        if status.success() {
            Ok(ProcessOutput {
                stdout,
                stderr,
                exit_code,
                duration,
            })
        } else {
            Err(ProcessError::Exit {
                code: exit_code,
                stdout,
                stderr,
            })
        }
    }
}

fn has_search_path(env: &[(String, String)]) -> bool {
    env.iter()
        .any(|(key, value)| key == "PATH" && !value.is_empty())
}

/// The inherited search path, or the fallback when it is missing or empty.
pub fn effective_path(inherited: Option<String>) -> String {
    inherited
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_PATH.to_string())
}

/// Kill the child's whole process group, then the child itself.
async fn kill_process_tree(child: &mut Child, program: &str) {
    #[cfg(unix)]
    if let Some(pgid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) {
        // SAFETY: signals only the group created for this child by `process_group(0)`.
        let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
        if rc != 0 {
            tracing::debug!(
                command = %program,
                "killpg failed: {}",
                std::io::Error::last_os_error()
            );
        }
    }
    if let Err(error) = child.kill().await {
        tracing::warn!(command = %program, "failed to kill timed out child: {error}");
    }
}

fn spawn_reader<R>(pipe: Option<R>, sink: Captured) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut chunk = [0_u8; 8192];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        let mut buf = sink.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                        if buf.len() < MAX_OUTPUT_BYTES {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                }
            }
        })
    })
}

/// Wait briefly for a reader to hit EOF, then take whatever it captured.
///
/// A process outside the killed group can keep the pipe open; the reader is
/// aborted after the grace period and its bytes so far are kept.
async fn drain(reader: Option<JoinHandle<()>>, captured: &Captured) -> String {
    if let Some(mut handle) = reader
        && tokio::time::timeout(DRAIN_GRACE, &mut handle).await.is_err()
    {
        handle.abort();
    }
    let bytes = std::mem::take(
        &mut *captured
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner),
    );
    decode_capped(&bytes)
}

fn decode_capped(bytes: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(bytes).to_string();
    if text.len() > MAX_OUTPUT_BYTES {
        text.truncate(text.floor_char_boundary(MAX_OUTPUT_BYTES));
        text.push_str("\n... [output truncated at 1MB]");
    }
    text
}
