use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn taidy() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taidy"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A scratch project with a private, initially empty, tool directory.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, relative: &str, content: &str) -> &Self {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Install a fake tool that prints its own command line and exits with `code`.
    #[cfg(unix)]
    fn tool(&self, name: &str, code: i32) -> &Self {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("bin").join(name);
        fs::write(&path, format!("#!/bin/sh\necho \"{name} $*\"\nexit {code}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = taidy();
        cmd.current_dir(self.path()).env("PATH", self.path().join("bin"));
        cmd
    }
}

#[test]
fn test_no_arguments_prints_usage() {
    taidy()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_subcommand_without_paths_prints_usage() {
    taidy()
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_command() {
    taidy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("taidy {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_help_lists_configuration() {
    taidy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(".taidy.json"))
        .stdout(predicate::str::contains("GitHub Actions workflows"));
}

#[test]
fn test_tools_lists_every_category() {
    let project = Project::new();
    project
        .cmd()
        .arg("tools")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains(".py (Python)"))
        .stdout(predicate::str::contains("ruff check --quiet"))
        .stdout(predicate::str::contains("(none installed)"));
}

#[test]
fn test_directory_with_only_git_metadata() {
    let project = Project::new();
    project.file("repo/.git/config", "[core]\n");

    project
        .cmd()
        .args(["--no-config", "repo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN: No supported files found in directory repo"))
        .stderr(predicate::str::contains(
            "INFO: No supported files provided, no files were linted",
        ));
}

#[test]
fn test_missing_path_is_a_warning() {
    let project = Project::new();
    project
        .cmd()
        .args(["--no-config", "nope.py"])
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN: Path nope.py does not exist, skipping"));
}

#[test]
fn test_missing_tool_is_a_warning() {
    let project = Project::new();
    project.file("main.go", "package main\n");

    project
        .cmd()
        .args(["--no-config", "lint", "main.go"])
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN: No available linter found for .go files"));
}

#[test]
fn test_bad_explicit_config_fails() {
    let project = Project::new();
    project.file("broken.json", "{");

    project
        .cmd()
        .args(["--config", "broken.json", "lint", "."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
#[cfg(unix)]
fn test_duplicate_inputs_and_unknown_extension() {
    let project = Project::new();
    project.file("a.py", "").file("b.unknownext", "").tool("ruff", 3);

    project
        .cmd()
        .args(["--no-config", "lint", "a.py", "a.py", "b.unknownext"])
        .assert()
        .code(3)
        .stdout("ruff check --quiet a.py\n")
        .stderr(predicate::str::contains("Running: ruff check --quiet a.py"))
        .stderr(predicate::str::contains(
            "WARN: No linter configured for file b.unknownext (extension: .unknownext)",
        ));
}

#[test]
#[cfg(unix)]
fn test_shared_formatter_runs_once() {
    let project = Project::new();
    project
        .file("data.json", "{}")
        .file("site.css", "")
        .file("README.md", "")
        .tool("prettier", 0);

    let assert = project
        .cmd()
        .args(["--no-config", "format", "data.json", "site.css", "README.md"])
        .assert()
        .success()
        .stdout("prettier --write --log-level error data.json site.css README.md\n");

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert_eq!(stderr.matches("Running: prettier").count(), 1);
}

#[test]
#[cfg(unix)]
fn test_first_installed_tool_wins() {
    let project = Project::new();
    project
        .file("app.py", "")
        .tool("black", 0)
        .tool("flake8", 0)
        .tool("pylint", 0);

    project
        .cmd()
        .args(["--no-config", "lint", "app.py"])
        .assert()
        .success()
        .stdout("black --check --quiet app.py\n");
}

#[test]
#[cfg(unix)]
fn test_lint_and_format_both_run() {
    let project = Project::new();
    project.file("app.py", "").tool("ruff", 0);

    project
        .cmd()
        .args(["--no-config", "-j", "1", "app.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ruff check --quiet app.py\n"))
        .stdout(predicate::str::contains("ruff format --quiet app.py\n"));
}

#[test]
#[cfg(unix)]
fn test_directory_is_passed_to_capable_tool() {
    let project = Project::new();
    project
        .file("src/a.py", "")
        .file("src/pkg/b.py", "")
        .tool("ruff", 0);

    project
        .cmd()
        .args(["--no-config", "format", "src"])
        .assert()
        .success()
        .stdout("ruff format --quiet src\n")
        .stderr(predicate::str::contains("INFO: Discovered 2 supported files in src"));
}

#[test]
#[cfg(unix)]
fn test_directory_named_like_a_subcommand_of_the_tool() {
    let project = Project::new();
    project
        .file("format/a.py", "")
        .file("check/b.py", "")
        .tool("ruff", 0);

    project
        .cmd()
        .args(["--no-config", "format", "format"])
        .assert()
        .success()
        .stdout("ruff format --quiet format\n");

    project
        .cmd()
        .args(["--no-config", "lint", "check"])
        .assert()
        .success()
        .stdout("ruff check --quiet check\n");
}

#[test]
#[cfg(unix)]
fn test_config_ignores_force_file_list() {
    let project = Project::new();
    project
        .file(".taidy.json", r#"{"ignore": ["vendor/**"]}"#)
        .file("src/a.py", "")
        .file("src/vendor/skip.py", "")
        .file("vendor/skip.py", "")
        .tool("ruff", 0);

    project
        .cmd()
        .args(["format", "."])
        .assert()
        .success()
        .stdout("ruff format --quiet src/a.py\n");
}

#[test]
#[cfg(unix)]
fn test_last_failing_tool_sets_exit_code() {
    let project = Project::new();
    project.file("app.py", "").file("main.go", "").tool("ruff", 0).tool("gofmt", 4);

    project
        .cmd()
        .args(["--no-config", "lint", "app.py", "main.go"])
        .assert()
        .code(4);
}

#[test]
#[cfg(unix)]
fn test_quiet_hides_trace() {
    let project = Project::new();
    project.file("app.py", "").tool("ruff", 0);

    project
        .cmd()
        .args(["--no-config", "--quiet", "lint", "app.py"])
        .assert()
        .success()
        .stdout("ruff check --quiet app.py\n")
        .stderr(predicate::str::contains("Running:").not());
}
