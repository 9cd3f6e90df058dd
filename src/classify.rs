//! Map a file path to its [`Category`].
//!
//! Classification only looks at the path: base name, suffix and ancestor
//! components. File contents are never read.

use crate::category::Category;
use std::path::{Component, Path};

/// Base name of a container build file without a suffix.
const CONTAINER_BUILD_FILE: &str = "dockerfile";

/// Build-script base name, with an optional companion suffix.
const BUILD_SCRIPT: &str = "justfile";
const BUILD_SCRIPT_SUFFIX: &str = ".just";

/// Classify a path, or return `None` if no category applies.
///
/// Identity rules are checked before the suffix table:
/// 1. `Dockerfile` (any case) is a Dockerfile regardless of suffix.
/// 2. A `.yml`/`.yaml` file below `.github/workflows` is a workflow.
/// 3. `justfile` / `.justfile` (any case, optionally with `.just`) is a build script.
pub fn classify(path: &Path) -> Option<Category> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();

    if name == CONTAINER_BUILD_FILE {
        return Some(Category::Dockerfile);
    }

    let suffix = lowercase_suffix(path);

    if matches!(suffix.as_deref(), Some(".yml" | ".yaml")) && is_in_workflow_dir(path) {
        return Some(Category::GithubWorkflow);
    }

    if is_build_script(&name) {
        return Some(Category::Justfile);
    }

    suffix.as_deref().and_then(Category::from_suffix)
}

/// The lowercased suffix including its leading dot, e.g. `.py`.
///
/// Follows `Path::extension`, so dotfiles such as `.bashrc` have no suffix.
pub fn lowercase_suffix(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

fn is_in_workflow_dir(path: &Path) -> bool {
    let components: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    // The last component is the file itself
    let ancestors = &components[..components.len().saturating_sub(1)];
    ancestors
        .windows(2)
        .any(|pair| pair[0] == ".github" && pair[1] == "workflows")
}

fn is_build_script(lower_name: &str) -> bool {
    let name = lower_name.strip_prefix('.').unwrap_or(lower_name);
    let name = name.strip_suffix(BUILD_SCRIPT_SUFFIX).unwrap_or(name);
    name == BUILD_SCRIPT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(path: &str) -> Option<Category> {
        classify(Path::new(path))
    }

    #[test]
    fn test_suffix_classification() {
        assert_eq!(class("a.py"), Some(Category::Python));
        assert_eq!(class("src/lib/main.rs"), Some(Category::Rust));
        assert_eq!(class("web/App.tsx"), Some(Category::Tsx));
        assert_eq!(class("infra/main.tf"), Some(Category::Terraform));
        assert_eq!(class("config.yml"), Some(Category::Yml));
    }

    #[test]
    fn test_suffix_is_case_insensitive() {
        assert_eq!(class("SCRIPT.PY"), Some(Category::Python));
        assert_eq!(class("README.Md"), Some(Category::Markdown));
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(class("b.unknownext"), None);
        assert_eq!(class("LICENSE"), None);
        assert_eq!(class(".bashrc"), None);
    }

    #[test]
    fn test_dockerfile_identity() {
        assert_eq!(class("Dockerfile"), Some(Category::Dockerfile));
        assert_eq!(class("deploy/DOCKERFILE"), Some(Category::Dockerfile));
        assert_eq!(class("images/app.dockerfile"), Some(Category::Dockerfile));
        // Only the exact base name is an identity match
        assert_eq!(class("Dockerfile.dev"), None);
    }

    #[test]
    fn test_workflow_identity() {
        assert_eq!(class(".github/workflows/ci.yml"), Some(Category::GithubWorkflow));
        assert_eq!(
            class("repo/.github/workflows/release.YAML"),
            Some(Category::GithubWorkflow)
        );
        assert_eq!(
            class("./.github/workflows/nested/build.yaml"),
            Some(Category::GithubWorkflow)
        );
    }

    #[test]
    fn test_workflow_requires_yaml_and_both_segments() {
        assert_eq!(class(".github/workflows/notes.md"), Some(Category::Markdown));
        assert_eq!(class(".github/dependabot.yml"), Some(Category::Yml));
        assert_eq!(class("workflows/ci.yml"), Some(Category::Yml));
        // Substring matches on a component are not enough
        assert_eq!(class("x.github/workflows/ci.yml"), Some(Category::Yml));
    }

    #[test]
    fn test_build_script_identity() {
        assert_eq!(class("justfile"), Some(Category::Justfile));
        assert_eq!(class("Justfile"), Some(Category::Justfile));
        assert_eq!(class("tools/.justfile"), Some(Category::Justfile));
        assert_eq!(class("Justfile.just"), Some(Category::Justfile));
        assert_eq!(class("justfile.bak"), None);
        assert_eq!(class("recipes.just"), None);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for path in ["a.py", "Dockerfile", ".github/workflows/ci.yml", "b.unknownext", "justfile"] {
            assert_eq!(class(path), class(path), "{path}");
        }
    }

    #[test]
    fn test_lowercase_suffix() {
        assert_eq!(lowercase_suffix(Path::new("a.PY")).as_deref(), Some(".py"));
        assert_eq!(lowercase_suffix(Path::new("archive.tar.GZ")).as_deref(), Some(".gz"));
        assert_eq!(lowercase_suffix(Path::new("Makefile")), None);
    }
}
