/*!
dispatch.rs - run a bound argument vector as a child process.

The child inherits stdin / stdout / stderr, so bytes flow straight between
the user's terminal (or pipe) and the child without passing through us.
The call blocks until the child terminates and hands back an
`ExecutionOutcome`; turning that into an exit status is the caller's job.
Nothing in here ever calls `std::process::exit`.
*/

use anyhow::{Context, Result};
use std::fmt;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/* ---- Errors ---- */

/// Reasons a `DispatchRequest` cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The argument vector had no elements.
    EmptyArgv,
    /// The first element (the program) was an empty string.
    EmptyProgram,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::EmptyArgv => f.write_str("cannot dispatch an empty argument vector"),
            DispatchError::EmptyProgram => f.write_str("cannot dispatch an empty program name"),
        }
    }
}

impl std::error::Error for DispatchError {}

/* ---- Request ---- */

/// A validated, non-empty argument vector ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    argv: Vec<String>,
}

impl DispatchRequest {
    pub fn new<I, S>(argv: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        match argv.first() {
            None => Err(DispatchError::EmptyArgv),
            Some(program) if program.is_empty() => Err(DispatchError::EmptyProgram),
            Some(_) => Ok(Self { argv }),
        }
    }

    /// Program to execute (also the child's zeroth argument).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Shell-quoted rendering, for display only.
    pub fn command_line(&self) -> String {
        shell_words::join(&self.argv)
    }
}

/* ---- Outcome ---- */

/// How a dispatched child ended.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Child ran and exited normally with this code.
    Exited(i32),
    /// Child was killed by this signal (unix only).
    Signaled(i32),
    /// Child could not be started.
    LaunchFailed {
        program: String,
        source: std::io::Error,
    },
}

impl ExecutionOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExecutionOutcome::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExecutionOutcome::Signaled(signal);
            }
        }
        // Neither a code nor a signal: nothing sensible to propagate.
        ExecutionOutcome::Exited(1)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Exited(0))
    }

    /// Exit status this process should terminate with.
    ///
    /// - `Exited(n)`: `n` unchanged when it fits in 0..=255, otherwise 1
    /// - `Signaled(s)`: `128 + s` (shell convention), capped at 255
    /// - `LaunchFailed`: 1
    pub fn exit_code(&self) -> u8 {
        match self {
            ExecutionOutcome::Exited(code) => u8::try_from(*code).unwrap_or(1),
            ExecutionOutcome::Signaled(signal) => {
                u8::try_from(128i64 + i64::from(*signal)).unwrap_or(u8::MAX)
            }
            ExecutionOutcome::LaunchFailed { .. } => 1,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Exited(code) => write!(f, "exited with status {code}"),
            ExecutionOutcome::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            ExecutionOutcome::LaunchFailed { program, source } => {
                write!(f, "failed to launch '{program}': {source}")
            }
        }
    }
}

/* ---- Dispatch ---- */

/// Spawn the request's program, wait for it, and report how it ended.
///
/// Blocks the calling thread. The runtime, the child handle and its stdio
/// bindings are all dropped before this returns, whatever the outcome.
/// `Err` is reserved for failures of our own plumbing (runtime creation,
/// waiting on an already spawned child).
pub fn dispatch(request: &DispatchRequest) -> Result<ExecutionOutcome> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    rt.block_on(dispatch_async(request))
}

/// Async variant of [`dispatch`].
pub async fn dispatch_async(request: &DispatchRequest) -> Result<ExecutionOutcome> {
    let mut command = Command::new(request.program());
    command
        .args(request.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            return Ok(ExecutionOutcome::LaunchFailed {
                program: request.program().to_string(),
                source,
            });
        }
    };

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for child process: {}", request.program()))?;

    Ok(ExecutionOutcome::from_status(status))
}

/* ---- Tests ---- */
