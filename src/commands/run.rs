//! Handler for linting and formatting runs (`taidy`, `taidy lint`, `taidy format`).

use anyhow::Context;
use std::io;

use taidy_lib::config::{Config, ConfigSource};
use taidy_lib::executor::{CancellationToken, ExecutionEngine};
use taidy_lib::runner::Runner;
use taidy_lib::tools::{Operation, PathOracle};

/// Settings shared by every run, taken from global flags.
pub struct RunContext {
    pub config_source: ConfigSource,
    pub jobs: Option<usize>,
    pub quiet: bool,
    pub token: CancellationToken,
}

/// Run `operations` over `paths` and return the process exit code.
pub fn handle_run(paths: &[String], operations: &[Operation], ctx: &RunContext) -> anyhow::Result<i32> {
    let config = Config::load(&ctx.config_source).context("Failed to load configuration")?;
    log::debug!("Ignore patterns from config: {:?}", config.ignore);

    let oracle = PathOracle::new();
    let engine = ExecutionEngine::new(ctx.token.clone())
        .with_jobs(ctx.jobs)
        .with_trace(!ctx.quiet);
    let runner = Runner::new(&oracle, &config, engine);

    // Unlocked handles; the engine locks both streams per output block
    let summary = runner.run(paths, operations, &mut io::stdout(), &mut io::stderr());
    log::debug!(
        "{} invocation(s), {} warning(s), exit code {}",
        summary.invocations,
        summary.warnings().count(),
        summary.exit_code
    );

    Ok(summary.exit_code)
}
