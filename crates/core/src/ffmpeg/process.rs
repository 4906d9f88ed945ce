//! Spawned ffmpeg processes and their readiness.

use std::io;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, ReadBuf};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Span};

use super::args::args_to_string;
use super::error::FfmpegError;

type StderrBuffer = Arc<Mutex<Vec<String>>>;

/// A running ffmpeg invocation.
///
/// Reading from the handle reads the process's stdout. The child is killed
/// when the handle is dropped.
#[derive(Debug)]
pub struct ProcessHandle {
    label: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr: StderrBuffer,
    stderr_task: Option<JoinHandle<()>>,
    span: Span,
}

/// Whether the arguments name stdin (`-i -`) as an input.
pub(crate) fn reads_stdin(args: &[String]) -> bool {
    args.windows(2).any(|pair| pair[0] == "-i" && pair[1] == "-")
}

/// Appends every non-blank line of `reader` to `buffer` until EOF.
pub(crate) async fn collect_lines<R>(reader: R, buffer: StderrBuffer)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end();
        if !line.is_empty() {
            buffer.lock().await.push(line.to_string());
        }
    }
}

/// Spawns `program` with `args`, labelled by the operation that asked for it.
pub(crate) fn spawn(
    program: &Path,
    args: Vec<String>,
    operation: &str,
    span: Span,
) -> Result<ProcessHandle, FfmpegError> {
    span.in_scope(|| {
        debug!(
            "About to spawn: \"{} {}\"",
            program.display(),
            args_to_string(&args)
        )
    });

    let stdin = if reads_stdin(&args) {
        Stdio::piped()
    } else {
        Stdio::null()
    };

    let mut child = Command::new(program)
        .args(&args)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FfmpegError::FfmpegNotFound {
                    path: program.to_path_buf(),
                }
            } else {
                FfmpegError::Io(e)
            }
        })?;

    let label = match child.id() {
        Some(pid) => format!("{} ffmpeg[{}]", operation, pid),
        None => format!("{} ffmpeg", operation),
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))?;

    let stderr: StderrBuffer = Arc::new(Mutex::new(Vec::new()));
    let stderr_task = child
        .stderr
        .take()
        .map(|pipe| tokio::spawn(collect_lines(pipe, Arc::clone(&stderr))));

    Ok(ProcessHandle {
        label,
        stdin: child.stdin.take(),
        child,
        stdout: BufReader::new(stdout),
        stderr,
        stderr_task,
        span,
    })
}

impl ProcessHandle {
    /// Identifying label, e.g. `source ffmpeg[1234]`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// OS process id, if the process has not been reaped yet.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Takes the write end of the process's stdin, present when the input is `-`.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.stdin.take()
    }

    /// Diagnostic lines collected from stderr so far.
    pub async fn stderr(&self) -> Vec<String> {
        self.stderr.lock().await.clone()
    }

    /// Waits until stdout has data or the process exits successfully.
    ///
    /// Nothing is consumed; subsequent reads see every byte. When the input
    /// is stdin, feed it before awaiting this or ffmpeg may never produce
    /// output.
    pub async fn readable(&mut self) -> Result<(), FfmpegError> {
        let filled = self.stdout.fill_buf().await.map(|buf| !buf.is_empty());
        let has_data = match filled {
            Ok(has_data) => has_data,
            Err(e) => return Err(self.read_failed(e).await),
        };

        if has_data {
            return Ok(());
        }

        let status = self.child.wait().await?;
        self.check_exit(status).await
    }

    /// Closes stdin, discards unread output and waits for the process to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus, FfmpegError> {
        drop(self.stdin.take());
        tokio::io::copy(&mut self.stdout, &mut tokio::io::sink()).await?;

        let status = self.child.wait().await?;
        self.check_exit(status).await?;
        Ok(status)
    }

    /// Kills the process.
    pub async fn kill(&mut self) -> Result<(), FfmpegError> {
        self.child.kill().await?;
        Ok(())
    }

    async fn check_exit(&mut self, status: ExitStatus) -> Result<(), FfmpegError> {
        if status.success() {
            return Ok(());
        }

        let lines = self.drain_stderr().await;
        Err(FfmpegError::process_failed(
            self.label.clone(),
            status.code(),
            &lines,
        ))
    }

    /// Stops a process whose stdout can no longer be read.
    async fn read_failed(&mut self, err: io::Error) -> FfmpegError {
        let _ = self.child.start_kill();
        self.drain_stderr().await;
        FfmpegError::Io(err)
    }

    /// Waits for the stderr collector to hit EOF, then logs what it gathered.
    async fn drain_stderr(&mut self) -> Vec<String> {
        if let Some(task) = self.stderr_task.take() {
            let _ = task.await;
        }
        self.report_stderr().await
    }

    async fn report_stderr(&self) -> Vec<String> {
        let lines = self.stderr().await;
        if !lines.is_empty() {
            self.span.in_scope(|| {
                warn!("{} STDERR:\n\t{}\n", self.label, lines.join("\n\t"));
            });
        }
        lines
    }
}

impl AsyncRead for ProcessHandle {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdout).poll_read(cx, buf)
    }
}
