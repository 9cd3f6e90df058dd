//! Built-in tool chains.
//!
//! For every (category, operation) pair the registry holds an ordered list of
//! candidate tools. The order is a preference ranking: the first installed
//! tool wins, later entries are fallbacks.

use super::availability::ToolOracle;
use crate::category::Category;
use std::fmt;

/// What to do with a group of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Lint,
    Format,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Lint, Operation::Format];

    /// Noun used in diagnostics ("No available linter found ...").
    pub fn tool_noun(self) -> &'static str {
        match self {
            Self::Lint => "linter",
            Self::Format => "formatter",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lint => f.write_str("lint"),
            Self::Format => f.write_str("format"),
        }
    }
}

/// How a tool receives its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileArgs {
    /// Input paths are appended after the fixed arguments.
    Append,
    /// The tool works on a fixed resource in the working directory and is
    /// invoked without any input paths.
    Implicit,
}

/// One candidate tool in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Executable name, also the name checked for availability.
    pub program: &'static str,
    /// Fixed arguments placed before any input paths.
    pub args: &'static [&'static str],
    /// The tool recurses into directories on its own.
    pub supports_directories: bool,
    pub file_args: FileArgs,
}

impl ToolDescriptor {
    const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self {
            program,
            args,
            supports_directories: false,
            file_args: FileArgs::Append,
        }
    }

    const fn directories(self) -> Self {
        Self {
            supports_directories: true,
            ..self
        }
    }

    const fn implicit(self) -> Self {
        Self {
            file_args: FileArgs::Implicit,
            ..self
        }
    }

    pub fn is_available(&self, oracle: &dyn ToolOracle) -> bool {
        oracle.is_available(self.program)
    }

    /// Build the full command line for `inputs`.
    pub fn build(&self, inputs: &[String]) -> Invocation {
        let mut args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        if self.file_args == FileArgs::Append {
            args.extend(inputs.iter().cloned());
        }
        Invocation {
            program: self.program.to_string(),
            args,
        }
    }
}

/// A concrete external command: executable plus argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `program arg1 arg2 ...`, for the `Running:` trace.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

// Shared descriptors

const PRETTIER_CHECK: ToolDescriptor = ToolDescriptor::new("prettier", &["--check", "--log-level", "error"]);
const PRETTIER_WRITE: ToolDescriptor =
    ToolDescriptor::new("prettier", &["--write", "--log-level", "error"]).directories();
const ESLINT: ToolDescriptor = ToolDescriptor::new("eslint", &["--quiet"]);
const TSC: ToolDescriptor = ToolDescriptor::new("tsc", &["--noEmit"]);
const YAMLLINT: ToolDescriptor = ToolDescriptor::new("yamllint", &["--quiet"]);
const SHELLCHECK: ToolDescriptor = ToolDescriptor::new("shellcheck", &["--quiet"]);
const BEAUTYSH_CHECK: ToolDescriptor = ToolDescriptor::new("beautysh", &["--check"]);
const SHFMT: ToolDescriptor = ToolDescriptor::new("shfmt", &["-w"]);
const BEAUTYSH: ToolDescriptor = ToolDescriptor::new("beautysh", &[]);

// Lint chains

const PYTHON_LINT: &[ToolDescriptor] = &[
    ToolDescriptor::new("ruff", &["check", "--quiet"]).directories(),
    ToolDescriptor::new("uvx", &["ruff", "check", "--quiet"]).directories(),
    ToolDescriptor::new("black", &["--check", "--quiet"]),
    ToolDescriptor::new("flake8", &["--quiet"]),
    ToolDescriptor::new("pylint", &["--quiet"]),
    // Syntax check as the last resort
    ToolDescriptor::new("python", &["-m", "py_compile"]),
];
const JAVASCRIPT_LINT: &[ToolDescriptor] = &[ESLINT, PRETTIER_CHECK, ToolDescriptor::new("node", &["--check"])];
const JSX_LINT: &[ToolDescriptor] = &[ESLINT, PRETTIER_CHECK];
const TYPESCRIPT_LINT: &[ToolDescriptor] = &[ESLINT, TSC, PRETTIER_CHECK];
const PRETTIER_LINT: &[ToolDescriptor] = &[PRETTIER_CHECK];
const GO_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("gofmt", &["-l"])];
const RUST_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("rustfmt", &["--check", "--quiet"])];
const RUBY_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("rubocop", &["--quiet"])];
const PHP_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("php-cs-fixer", &["fix", "--dry-run", "--quiet"])];
const SHELL_LINT: &[ToolDescriptor] = &[SHELLCHECK, BEAUTYSH_CHECK];
const YAML_LINT: &[ToolDescriptor] = &[YAMLLINT, PRETTIER_CHECK];
const TOML_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("taplo", &["check", "--quiet"])];
const TERRAFORM_LINT: &[ToolDescriptor] = &[
    // validate checks the module in the working directory, not single files
    ToolDescriptor::new("terraform", &["validate"]).implicit(),
    ToolDescriptor::new("tflint", &["--quiet"]),
];
const DOCKERFILE_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("hadolint", &["--quiet"])];
const WORKFLOW_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("actionlint", &["-quiet"]), YAMLLINT, PRETTIER_CHECK];
const JUSTFILE_LINT: &[ToolDescriptor] = &[ToolDescriptor::new("just", &["--fmt", "--check", "--unstable"]).implicit()];

// Format chains

const PYTHON_FORMAT: &[ToolDescriptor] = &[
    ToolDescriptor::new("ruff", &["format", "--quiet"]).directories(),
    ToolDescriptor::new("uvx", &["ruff", "format", "--quiet"]).directories(),
    ToolDescriptor::new("black", &["--quiet"]).directories(),
];
const PRETTIER_FORMAT: &[ToolDescriptor] = &[PRETTIER_WRITE];
const GO_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("gofmt", &["-w"]).directories()];
const RUST_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("rustfmt", &["--quiet"])];
const RUBY_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("rubocop", &["-a", "--quiet"]).directories()];
const PHP_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("php-cs-fixer", &["fix", "--quiet"])];
const SHELL_FORMAT: &[ToolDescriptor] = &[SHFMT, BEAUTYSH];
const TOML_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("taplo", &["format"])];
const TERRAFORM_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("terraform", &["fmt"])];
const JUSTFILE_FORMAT: &[ToolDescriptor] = &[ToolDescriptor::new("just", &["--fmt", "--unstable"]).implicit()];

/// The ordered tool chain for a category and operation, if one exists.
pub fn chain_for(category: Category, operation: Operation) -> Option<&'static [ToolDescriptor]> {
    use Category::*;

    let chain = match operation {
        Operation::Lint => match category {
            Python => PYTHON_LINT,
            JavaScript => JAVASCRIPT_LINT,
            Jsx => JSX_LINT,
            TypeScript | Tsx => TYPESCRIPT_LINT,
            Json | Css | Scss | Html | Markdown => PRETTIER_LINT,
            Go => GO_LINT,
            Rust => RUST_LINT,
            Ruby => RUBY_LINT,
            Php => PHP_LINT,
            Sh | Bash | Zsh => SHELL_LINT,
            Yaml | Yml => YAML_LINT,
            Toml => TOML_LINT,
            Terraform | TerraformVars => TERRAFORM_LINT,
            Dockerfile => DOCKERFILE_LINT,
            GithubWorkflow => WORKFLOW_LINT,
            Justfile => JUSTFILE_LINT,
        },
        Operation::Format => match category {
            Python => PYTHON_FORMAT,
            JavaScript | Jsx | TypeScript | Tsx | Json | Css | Scss | Html | Markdown | Yaml | Yml
            | GithubWorkflow => PRETTIER_FORMAT,
            Go => GO_FORMAT,
            Rust => RUST_FORMAT,
            Ruby => RUBY_FORMAT,
            Php => PHP_FORMAT,
            Sh | Bash | Zsh => SHELL_FORMAT,
            Toml => TOML_FORMAT,
            Terraform | TerraformVars => TERRAFORM_FORMAT,
            Justfile => JUSTFILE_FORMAT,
            Dockerfile => return None,
        },
    };
    Some(chain)
}

/// Whether any of `operations` has a chain for `category`.
pub fn has_chain(category: Category, operations: &[Operation]) -> bool {
    operations.iter().any(|&op| chain_for(category, op).is_some())
}

/// The first available descriptor in a chain. Later entries are not consulted.
pub fn select<'a>(chain: &'a [ToolDescriptor], oracle: &dyn ToolOracle) -> Option<&'a ToolDescriptor> {
    chain.iter().find(|tool| tool.is_available(oracle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::StaticOracle;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_category_has_a_lint_chain() {
        for category in Category::ALL {
            let chain = chain_for(category, Operation::Lint);
            assert!(chain.is_some_and(|c| !c.is_empty()), "{category} has no lint chain");
        }
    }

    #[test]
    fn test_dockerfile_has_no_formatter() {
        assert!(chain_for(Category::Dockerfile, Operation::Format).is_none());
        assert!(has_chain(Category::Dockerfile, &[Operation::Lint]));
        assert!(!has_chain(Category::Dockerfile, &[Operation::Format]));
    }

    #[test]
    fn test_python_lint_preference_order() {
        let chain = chain_for(Category::Python, Operation::Lint).unwrap();
        let programs: Vec<&str> = chain.iter().map(|t| t.program).collect();
        assert_eq!(programs, vec!["ruff", "uvx", "black", "flake8", "pylint", "python"]);
    }

    #[test]
    fn test_build_appends_files() {
        let chain = chain_for(Category::Python, Operation::Lint).unwrap();
        let invocation = chain[0].build(&files(&["a.py", "b.py"]));
        assert_eq!(invocation.program, "ruff");
        assert_eq!(invocation.args, vec!["check", "--quiet", "a.py", "b.py"]);
        assert_eq!(invocation.command_line(), "ruff check --quiet a.py b.py");
    }

    #[test]
    fn test_implicit_tools_ignore_files() {
        let chain = chain_for(Category::Justfile, Operation::Lint).unwrap();
        let invocation = chain[0].build(&files(&["justfile"]));
        assert_eq!(invocation.program, "just");
        assert_eq!(invocation.args, vec!["--fmt", "--check", "--unstable"]);
    }

    #[test]
    fn test_select_is_first_match() {
        let chain = chain_for(Category::Python, Operation::Lint).unwrap();
        let oracle = StaticOracle::new(["black", "python"]);
        let selected = select(chain, &oracle).unwrap();
        assert_eq!(selected.program, "black");

        let none = StaticOracle::default();
        assert!(select(chain, &none).is_none());
    }

    #[test]
    fn test_structured_text_shares_one_formatter() {
        let json = chain_for(Category::Json, Operation::Format).unwrap();
        let css = chain_for(Category::Css, Operation::Format).unwrap();
        assert_eq!(json[0], css[0]);
        assert!(json[0].supports_directories);
    }

    #[test]
    fn test_command_line_without_args() {
        let invocation = Invocation {
            program: "beautysh".to_string(),
            args: vec![],
        };
        assert_eq!(invocation.command_line(), "beautysh");
    }
}
