//! Execution engine for planned tool invocations.
//!
//! Every batch runs as one external process on a bounded rayon pool. Output
//! is captured, never inherited, and each worker sends its finished result
//! over a channel to a single consumer on the calling thread. That consumer
//! is the only writer to the caller's streams, so one invocation's trace,
//! stdout and stderr always appear as one contiguous block.

use crate::exit_codes;
use crate::planner::{Batch, InvocationSignature};
use crate::tools::Invocation;
use indexmap::IndexMap;
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared interrupt flag. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Why an invocation produced no tool exit status of its own.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("command not found")]
    NotFound { program: String },

    #[error("failed to start: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("interrupted")]
    Interrupted { program: String },
}

impl ExecutionError {
    pub fn program(&self) -> &str {
        match self {
            Self::NotFound { program }
            | Self::Spawn { program, .. }
            | Self::Wait { program, .. }
            | Self::Interrupted { program } => program,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_codes::COMMAND_NOT_FOUND,
            Self::Interrupted { .. } => exit_codes::INTERRUPTED,
            Self::Spawn { .. } | Self::Wait { .. } => exit_codes::GENERAL_ERROR,
        }
    }
}

/// Outcome of one batch.
#[derive(Debug)]
pub struct ExecutionResult {
    pub invocation: Invocation,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<ExecutionError>,
}

impl ExecutionResult {
    fn failed(invocation: Invocation, error: ExecutionError) -> Self {
        Self {
            invocation,
            exit_code: error.exit_code(),
            stdout: String::new(),
            stderr: String::new(),
            error: Some(error),
        }
    }

    pub fn program(&self) -> &str {
        &self.invocation.program
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self.error, Some(ExecutionError::Interrupted { .. }))
    }
}

/// Runs batches concurrently and reports results in completion order.
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    /// Upper bound on worker threads. `None` means hardware parallelism.
    jobs: Option<usize>,
    token: CancellationToken,
    /// Emit the `Running:` line before each block.
    trace: bool,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

impl ExecutionEngine {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            jobs: None,
            token,
            trace: true,
        }
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// min(batches, hardware parallelism, --jobs), at least one.
    pub fn worker_count(&self, batches: usize) -> usize {
        let hardware = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let mut workers = batches.min(hardware);
        if let Some(jobs) = self.jobs {
            workers = workers.min(jobs);
        }
        workers.max(1)
    }

    /// Run every batch and write each finished invocation's block to `out` /
    /// `err` as soon as it completes.
    ///
    /// The returned map is keyed by signature and ordered by completion.
    /// Failures are recorded in the results, never returned.
    pub fn run_all(
        &self,
        batches: &[Batch],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> IndexMap<InvocationSignature, ExecutionResult> {
        let mut results = IndexMap::new();
        if batches.is_empty() {
            return results;
        }

        let workers = self.worker_count(batches.len());
        log::debug!("Running {} invocation(s) on {workers} worker(s)", batches.len());

        let (tx, rx) = mpsc::channel::<(InvocationSignature, ExecutionResult)>();
        let token = &self.token;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("taidy-worker-{i}"))
            .build();

        match pool {
            Ok(pool) => pool.in_place_scope(|scope| {
                for batch in batches {
                    let tx = tx.clone();
                    scope.spawn(move |_| {
                        let result = run_batch(batch, token);
                        // Receiver outlives the scope
                        let _ = tx.send((batch.signature.clone(), result));
                    });
                }
                drop(tx);
                self.consume(rx, &mut results, out, err);
            }),
            Err(e) => {
                log::warn!("Failed to create worker pool, running sequentially: {e}");
                for batch in batches {
                    let _ = tx.send((batch.signature.clone(), run_batch(batch, token)));
                }
                drop(tx);
                self.consume(rx, &mut results, out, err);
            }
        }

        results
    }

    fn consume(
        &self,
        rx: mpsc::Receiver<(InvocationSignature, ExecutionResult)>,
        results: &mut IndexMap<InvocationSignature, ExecutionResult>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) {
        for (signature, result) in rx {
            // Worker threads log to stderr; holding both process streams keeps
            // their lines out of the middle of a block. The locks are
            // reentrant, so `out`/`err` may be these same streams.
            let stdout = io::stdout().lock();
            let stderr = io::stderr().lock();
            let written = self.emit(&result, out, err);
            drop((stdout, stderr));

            if let Err(e) = written {
                log::warn!("Failed to write output of {}: {e}", result.program());
            }
            results.insert(signature, result);
        }
    }

    fn emit(&self, result: &ExecutionResult, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        if self.trace {
            writeln!(err, "Running: {}", result.invocation.command_line())?;
            err.flush()?;
        }
        if !result.stdout.is_empty() {
            out.write_all(result.stdout.as_bytes())?;
            out.flush()?;
        }
        if !result.stderr.is_empty() {
            err.write_all(result.stderr.as_bytes())?;
        }
        if let Some(error) = &result.error
            && !result.is_interrupted()
        {
            writeln!(err, "Error executing {}: {error}", error.program())?;
        }
        err.flush()
    }
}

/// Run one batch to completion, or until `token` is cancelled.
pub fn run_batch(batch: &Batch, token: &CancellationToken) -> ExecutionResult {
    let invocation = batch.invocation();
    let program = invocation.program.clone();

    if token.is_cancelled() {
        return ExecutionResult::failed(invocation, ExecutionError::Interrupted { program });
    }

    let spawned = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return ExecutionResult::failed(invocation, ExecutionError::NotFound { program });
        }
        Err(source) => {
            return ExecutionResult::failed(invocation, ExecutionError::Spawn { program, source });
        }
    };

    // Drain both pipes while waiting so a chatty tool cannot block on a full pipe
    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| thread::spawn(move || read_pipe_to_string(stdout)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| thread::spawn(move || read_pipe_to_string(stderr)));

    let waited = match wait_or_cancel(&mut child, token) {
        Ok(Some(status)) => Ok(status),
        Ok(None) => {
            // Grandchildren may still hold the pipes open; leave the readers detached
            return ExecutionResult::failed(invocation, ExecutionError::Interrupted { program });
        }
        Err(e) => Err(e),
    };
    let stdout = join_reader(stdout_handle);
    let stderr = join_reader(stderr_handle);

    match waited {
        Ok(status) => ExecutionResult {
            exit_code: exit_code_of(status),
            invocation,
            stdout,
            stderr,
            error: None,
        },
        Err(source) => ExecutionResult {
            exit_code: exit_codes::GENERAL_ERROR,
            invocation,
            stdout,
            stderr,
            error: Some(ExecutionError::Wait { program, source }),
        },
    }
}

/// Poll the child until it exits. Returns `Ok(None)` if the token was
/// cancelled first, after killing the child.
fn wait_or_cancel(child: &mut Child, token: &CancellationToken) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if token.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            // Shell convention for death by signal
            return 128 + signal;
        }
    }

    exit_codes::GENERAL_ERROR
}

fn read_pipe_to_string<R: Read>(mut pipe: R) -> io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<String>>>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    match handle.join() {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::warn!("Failed to read tool output: {e}");
            String::new()
        }
        Err(_) => {
            log::warn!("Output reader thread panicked");
            String::new()
        }
    }
}
