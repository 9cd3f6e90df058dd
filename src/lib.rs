//! taidy: pick and run the right external linters and formatters.
//!
//! The library covers the whole pipeline behind the `taidy` binary:
//! [`classify`] maps paths to a [`Category`], [`discovery`] expands
//! directories, [`planner`] selects one tool per category and merges
//! identical invocations, [`executor`] runs them concurrently and
//! [`aggregate`] folds the results into an exit code. [`runner::Runner`]
//! strings the stages together.

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod exit_codes;
pub mod planner;
pub mod runner;
pub mod tools;

pub use aggregate::{Diagnostic, RunSummary};
pub use category::Category;
pub use classify::classify;
pub use config::{Config, ConfigError, ConfigSource};
pub use executor::{CancellationToken, ExecutionEngine, ExecutionError, ExecutionResult};
pub use planner::{Batch, FileGroup, InvocationSignature, Plan, Planner};
pub use runner::Runner;
pub use tools::{Operation, PathOracle, StaticOracle, ToolOracle};
