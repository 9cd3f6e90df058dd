//! Directory discovery and ignore rules.

use crate::classify::classify;
use crate::tools::{Operation, has_chain};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Component, Path};
use std::sync::Arc;

/// Directories and artifacts that are never worth linting.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".pytest_cache",
    "dist",
    "build",
    ".venv",
    "venv",
    ".env",
    "env",
    "*.egg-info",
    ".mypy_cache",
    ".ruff_cache",
    ".coverage",
];

/// Built-in ignore patterns followed by caller-supplied ones.
///
/// A path is ignored when any pattern matches the whole path, the path
/// relative to the discovery root or any trailing part of it, the base name,
/// or a single path segment. `*` also matches `/`.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    custom_count: usize,
}

impl IgnoreRules {
    /// Build the rule set. Invalid custom patterns are skipped with a warning.
    pub fn new(custom: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut custom_count = 0;

        let defaults = DEFAULT_IGNORE_PATTERNS.iter().map(|p| (p.to_string(), false));
        let customs = custom.iter().map(|p| (p.clone(), true));

        for (pattern, is_custom) in defaults.chain(customs) {
            match Glob::new(&pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    if is_custom {
                        custom_count += 1;
                    }
                }
                Err(e) => log::warn!("Invalid ignore pattern '{pattern}': {e}"),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            log::warn!("Failed to compile ignore patterns: {e}");
            GlobSet::empty()
        });

        Self { set, custom_count }
    }

    /// The built-in patterns only.
    pub fn defaults() -> Self {
        Self::new(&[])
    }

    /// Whether the caller supplied any (valid) patterns beyond the defaults.
    pub fn has_custom(&self) -> bool {
        self.custom_count > 0
    }

    /// Check `path` (as walked) against every rule. `root` is the directory
    /// the walk started from.
    pub fn is_ignored(&self, path: &Path, root: &Path) -> bool {
        if self.set.is_match(path) {
            return true;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        // Relative path and each trailing sub-path, down to the base name
        for start in 0..segments.len() {
            if self.set.is_match(segments[start..].join("/")) {
                return true;
            }
        }

        segments.iter().any(|segment| self.set.is_match(segment))
    }

    fn matches_name(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Recursively find every file below `directory` that some tool chain in
/// `operations` can handle, skipping ignored paths.
///
/// Returns the paths sorted lexicographically. Unreadable entries are logged
/// and skipped.
pub fn discover(directory: &str, rules: &IgnoreRules, operations: &[Operation]) -> Vec<String> {
    let root = Path::new(directory).to_path_buf();
    let prune_rules = Arc::new(rules.clone());

    let mut walk_builder = WalkBuilder::new(&root);
    walk_builder
        .standard_filters(false) // only our own rules apply
        .follow_links(false)
        .filter_entry(move |entry| {
            // Prune ignored directories below the root; the root itself is
            // what the caller asked for
            if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
                return true;
            }
            !prune_rules.matches_name(&entry.file_name().to_string_lossy())
        });

    let mut files = Vec::new();
    for result in walk_builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Error walking directory {directory}: {err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if rules.is_ignored(path, &root) {
            log::debug!("Ignoring {}", path.display());
            continue;
        }

        let Some(category) = classify(path) else {
            continue;
        };
        if !has_chain(category, operations) {
            continue;
        }

        let path_str = path.to_string_lossy();
        let cleaned = path_str.strip_prefix("./").unwrap_or(&path_str);
        files.push(cleaned.to_string());
    }

    files.sort();
    files.dedup();
    files
}
