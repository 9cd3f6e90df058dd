//! End-to-end run: inputs → discovery → classification → planning →
//! execution → aggregation.

use crate::aggregate::{Aggregator, Diagnostic, RunSummary};
use crate::classify::{classify, lowercase_suffix};
use crate::config::Config;
use crate::discovery::{IgnoreRules, discover};
use crate::executor::ExecutionEngine;
use crate::planner::{DirectoryInputs, FileGroup, Plan, Planner};
use crate::tools::{Operation, ToolOracle, has_chain};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Everything decided before any tool runs.
#[derive(Debug)]
pub struct Prepared {
    pub group: FileGroup,
    pub plan: Plan,
    aggregator: Aggregator,
}

impl Prepared {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.aggregator.diagnostics()
    }
}

pub struct Runner<'a> {
    oracle: &'a dyn ToolOracle,
    config: &'a Config,
    engine: ExecutionEngine,
}

impl<'a> Runner<'a> {
    pub fn new(oracle: &'a dyn ToolOracle, config: &'a Config, engine: ExecutionEngine) -> Self {
        Self { oracle, config, engine }
    }

    /// Run `operations` over `inputs`, writing tool output to `out` / `err`.
    pub fn run(&self, inputs: &[String], operations: &[Operation], out: &mut dyn Write, err: &mut dyn Write) -> RunSummary {
        let Prepared {
            plan, mut aggregator, ..
        } = self.prepare(inputs, operations);

        if plan.is_empty() {
            return aggregator.finish();
        }

        if self.engine.token().is_cancelled() {
            aggregator.mark_interrupted();
            return aggregator.finish();
        }

        let results = self.engine.run_all(&plan.batches, out, err);
        aggregator.record_results(&results);
        if self.engine.token().is_cancelled() {
            aggregator.mark_interrupted();
        }
        aggregator.finish()
    }

    /// Expand, classify and plan without running anything. Diagnostics are
    /// logged as they are found.
    pub fn prepare(&self, inputs: &[String], operations: &[Operation]) -> Prepared {
        let mut aggregator = Aggregator::new();
        let rules = IgnoreRules::new(&self.config.ignore);

        let mut directories = Vec::new();
        let mut explicit_files = HashSet::new();
        let mut expanded = Vec::new();

        for input in inputs {
            let path = Path::new(input);
            if !path.exists() {
                aggregator.report(Diagnostic::MissingPath { path: input.clone() });
                continue;
            }

            if path.is_dir() {
                directories.push(input.clone());
                let discovered = discover(input, &rules, operations);
                if discovered.is_empty() {
                    aggregator.report(Diagnostic::EmptyDirectory {
                        directory: input.clone(),
                    });
                } else {
                    log::info!("Discovered {} supported files in {input}", discovered.len());
                    expanded.extend(discovered);
                }
            } else {
                explicit_files.insert(input.clone());
                expanded.push(input.clone());
            }
        }

        let mut group = FileGroup::new();
        for file in expanded {
            match classify(Path::new(&file)).filter(|&category| has_chain(category, operations)) {
                Some(category) => {
                    group.insert(category, file);
                }
                None => {
                    let extension = lowercase_suffix(Path::new(&file)).unwrap_or_default();
                    aggregator.report(Diagnostic::Unclassified { path: file, extension });
                }
            }
        }

        if group.is_empty() {
            aggregator.report(Diagnostic::NothingToDo);
            return Prepared {
                group,
                plan: Plan::default(),
                aggregator,
            };
        }

        let directory_inputs = DirectoryInputs {
            directories,
            explicit_files,
            custom_ignores: self.config.has_custom_ignores(),
        };
        let plan = Planner::new(self.oracle)
            .with_directory_inputs(directory_inputs)
            .plan(&group, operations);

        for missing in &plan.missing {
            aggregator.report(Diagnostic::MissingTool(*missing));
        }

        Prepared {
            group,
            plan,
            aggregator,
        }
    }
}
