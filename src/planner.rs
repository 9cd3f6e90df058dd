//! Batching planner.
//!
//! Turns grouped files into the smallest set of external invocations: one
//! tool per (category, operation), and one process per distinct command
//! signature, fed the union of all inputs that resolved to it.

use crate::category::Category;
use crate::tools::{FileArgs, Invocation, Operation, ToolDescriptor, ToolOracle, chain_for, select};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fmt;

/// Files grouped by category, in first-seen order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    groups: IndexMap<Category, IndexSet<String>>,
}

impl FileGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Returns `false` if it was already present.
    pub fn insert(&mut self, category: Category, file: impl Into<String>) -> bool {
        self.groups.entry(category).or_default().insert(file.into())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn files(&self, category: Category) -> Option<&IndexSet<String>> {
        self.groups.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &IndexSet<String>)> {
        self.groups.iter().map(|(category, files)| (*category, files))
    }
}

/// The batching key: executable plus every argument that is not an input path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationSignature {
    pub program: String,
    pub fixed_args: Vec<String>,
}

impl InvocationSignature {
    /// The signature of any command built from `tool`.
    ///
    /// Taken from the descriptor rather than recovered from a built command
    /// line, so an input path that happens to equal a fixed argument (a
    /// directory called `check`, say) never removes that argument.
    pub fn of(tool: &ToolDescriptor) -> Self {
        Self {
            program: tool.program.to_string(),
            fixed_args: tool.args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl fmt::Display for InvocationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.fixed_args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// One planned external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub signature: InvocationSignature,
    pub file_args: FileArgs,
    /// Union of inputs from every contributing (category, operation).
    pub inputs: IndexSet<String>,
    /// Which (category, operation) pairs were merged into this batch.
    pub sources: Vec<(Category, Operation)>,
}

impl Batch {
    /// The command to run: fixed arguments followed by the inputs, unless the
    /// tool takes no file arguments.
    pub fn invocation(&self) -> Invocation {
        let mut args = self.signature.fixed_args.clone();
        if self.file_args == FileArgs::Append {
            args.extend(self.inputs.iter().cloned());
        }
        Invocation {
            program: self.signature.program.clone(),
            args,
        }
    }
}

/// A (category, operation) with a chain but no installed tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingTool {
    pub category: Category,
    pub operation: Operation,
}

impl fmt::Display for MissingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No available {} found for {} files",
            self.operation.tool_noun(),
            self.category
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Distinct invocations in first-planned order.
    pub batches: Vec<Batch>,
    pub missing: Vec<MissingTool>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Top-level directory arguments, for tools that can walk directories
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct DirectoryInputs {
    pub directories: Vec<String>,
    /// Files named directly on the command line. They are passed alongside
    /// the directories since the tool would not find them otherwise.
    pub explicit_files: HashSet<String>,
    /// Custom ignore patterns are configured; the tool would not honor them,
    /// so directories are never handed over.
    pub custom_ignores: bool,
}

impl DirectoryInputs {
    fn usable(&self) -> bool {
        !self.directories.is_empty() && !self.custom_ignores
    }
}

pub struct Planner<'a> {
    oracle: &'a dyn ToolOracle,
    directory_inputs: DirectoryInputs,
}

impl<'a> Planner<'a> {
    pub fn new(oracle: &'a dyn ToolOracle) -> Self {
        Self {
            oracle,
            directory_inputs: DirectoryInputs::default(),
        }
    }

    pub fn with_directory_inputs(mut self, directory_inputs: DirectoryInputs) -> Self {
        self.directory_inputs = directory_inputs;
        self
    }

    /// Plan every requested operation for every category in `group`.
    ///
    /// Categories without a chain for an operation are skipped silently;
    /// chains without an installed tool are reported in [`Plan::missing`].
    pub fn plan(&self, group: &FileGroup, operations: &[Operation]) -> Plan {
        let mut batches: IndexMap<InvocationSignature, Batch> = IndexMap::new();
        let mut missing = Vec::new();

        for (category, files) in group.iter() {
            for &operation in operations {
                let Some(chain) = chain_for(category, operation) else {
                    continue;
                };

                let Some(tool) = select(chain, self.oracle) else {
                    log::debug!("No tool installed for {category} ({operation})");
                    missing.push(MissingTool { category, operation });
                    continue;
                };

                let inputs = self.inputs_for(tool.supports_directories, files);
                let signature = InvocationSignature::of(tool);
                log::debug!("{category} ({operation}) -> {signature}");

                let batch = batches.entry(signature.clone()).or_insert_with(|| Batch {
                    signature,
                    file_args: tool.file_args,
                    inputs: IndexSet::new(),
                    sources: Vec::new(),
                });
                batch.inputs.extend(inputs);
                batch.sources.push((category, operation));
            }
        }

        Plan {
            batches: batches.into_values().collect(),
            missing,
        }
    }

    fn inputs_for(&self, supports_directories: bool, files: &IndexSet<String>) -> Vec<String> {
        if supports_directories && self.directory_inputs.usable() {
            let mut inputs = self.directory_inputs.directories.clone();
            inputs.extend(
                files
                    .iter()
                    .filter(|f| self.directory_inputs.explicit_files.contains(*f))
                    .cloned(),
            );
            inputs
        } else {
            files.iter().cloned().collect()
        }
    }
}
