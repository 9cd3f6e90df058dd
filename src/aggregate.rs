//! Result aggregation.
//!
//! Folds per-invocation exit codes into one process exit code and collects
//! the non-fatal diagnostics produced along the way.

use crate::executor::ExecutionResult;
use crate::exit_codes;
use crate::planner::{InvocationSignature, MissingTool};
use indexmap::IndexMap;
use log::Level;
use std::fmt;

/// A non-fatal condition reported during a run. None of these change the
/// exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    MissingPath { path: String },
    EmptyDirectory { directory: String },
    /// No category, or no chain for the requested operations.
    Unclassified { path: String, extension: String },
    MissingTool(MissingTool),
    NothingToDo,
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Self::NothingToDo => Level::Info,
            _ => Level::Warn,
        }
    }

    /// Emit through the `log` facade at this diagnostic's level.
    pub fn log(&self) {
        log::log!(self.level(), "{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPath { path } => write!(f, "Path {path} does not exist, skipping"),
            Self::EmptyDirectory { directory } => {
                write!(f, "No supported files found in directory {directory}")
            }
            Self::Unclassified { path, extension } => {
                write!(f, "No linter configured for file {path} (extension: {extension})")
            }
            Self::MissingTool(missing) => write!(f, "{missing}"),
            Self::NothingToDo => f.write_str("No supported files provided, no files were linted"),
        }
    }
}

/// The last non-zero code, or 0 when every code is zero.
pub fn last_non_zero<I>(codes: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    codes
        .into_iter()
        .filter(|&code| code != exit_codes::SUCCESS)
        .last()
        .unwrap_or(exit_codes::SUCCESS)
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub exit_code: i32,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of external processes that were planned.
    pub invocations: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.exit_code == exit_codes::SUCCESS
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level() == Level::Warn)
    }
}

/// Collects diagnostics and results for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    diagnostics: Vec<Diagnostic>,
    codes: Vec<i32>,
    invocations: usize,
    interrupted: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    /// Fold in execution results, which must be in completion order.
    pub fn record_results(&mut self, results: &IndexMap<InvocationSignature, ExecutionResult>) {
        self.invocations += results.len();
        for result in results.values() {
            if result.is_interrupted() {
                self.interrupted = true;
            }
            self.codes.push(result.exit_code);
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    pub fn finish(self) -> RunSummary {
        let exit_code = if self.interrupted {
            exit_codes::INTERRUPTED
        } else {
            last_non_zero(self.codes)
        };

        RunSummary {
            exit_code,
            diagnostics: self.diagnostics,
            invocations: self.invocations,
            interrupted: self.interrupted,
        }
    }
}
