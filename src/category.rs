//! File categories.
//!
//! A category is the key that decides which tool chains apply to a file. Most
//! categories are a lowercased file suffix (`.py`, `.json`); a few are assigned
//! by identity rules in [`crate::classify`] (Dockerfiles, GitHub Actions
//! workflows, justfiles).

use std::fmt;

/// Every category the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Python,
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Json,
    Css,
    Scss,
    Html,
    Markdown,
    Go,
    Rust,
    Ruby,
    Php,
    Sh,
    Bash,
    Zsh,
    Yaml,
    Yml,
    Toml,
    Terraform,
    TerraformVars,
    Dockerfile,
    GithubWorkflow,
    Justfile,
}

impl Category {
    pub const ALL: [Category; 25] = [
        Category::Python,
        Category::JavaScript,
        Category::Jsx,
        Category::TypeScript,
        Category::Tsx,
        Category::Json,
        Category::Css,
        Category::Scss,
        Category::Html,
        Category::Markdown,
        Category::Go,
        Category::Rust,
        Category::Ruby,
        Category::Php,
        Category::Sh,
        Category::Bash,
        Category::Zsh,
        Category::Yaml,
        Category::Yml,
        Category::Toml,
        Category::Terraform,
        Category::TerraformVars,
        Category::Dockerfile,
        Category::GithubWorkflow,
        Category::Justfile,
    ];

    /// The category key as shown in diagnostics.
    ///
    /// Suffix categories use their dotted suffix. Identity categories use a
    /// pseudo-suffix (`.github-workflow`) or, for build scripts, a bare name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Python => ".py",
            Self::JavaScript => ".js",
            Self::Jsx => ".jsx",
            Self::TypeScript => ".ts",
            Self::Tsx => ".tsx",
            Self::Json => ".json",
            Self::Css => ".css",
            Self::Scss => ".scss",
            Self::Html => ".html",
            Self::Markdown => ".md",
            Self::Go => ".go",
            Self::Rust => ".rs",
            Self::Ruby => ".rb",
            Self::Php => ".php",
            Self::Sh => ".sh",
            Self::Bash => ".bash",
            Self::Zsh => ".zsh",
            Self::Yaml => ".yaml",
            Self::Yml => ".yml",
            Self::Toml => ".toml",
            Self::Terraform => ".tf",
            Self::TerraformVars => ".tfvars",
            Self::Dockerfile => ".dockerfile",
            Self::GithubWorkflow => ".github-workflow",
            Self::Justfile => "justfile",
        }
    }

    /// Human-readable language name, used by `taidy tools`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::Jsx => "JavaScript (JSX)",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TypeScript (TSX)",
            Self::Json => "JSON",
            Self::Css => "CSS",
            Self::Scss => "SCSS",
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Ruby => "Ruby",
            Self::Php => "PHP",
            Self::Sh => "Shell",
            Self::Bash => "Bash",
            Self::Zsh => "Zsh",
            Self::Yaml | Self::Yml => "YAML",
            Self::Toml => "TOML",
            Self::Terraform => "Terraform",
            Self::TerraformVars => "Terraform variables",
            Self::Dockerfile => "Dockerfile",
            Self::GithubWorkflow => "GitHub Actions workflow",
            Self::Justfile => "justfile",
        }
    }

    /// Look up a suffix category. `suffix` includes the leading dot and must
    /// already be lowercased.
    ///
    /// Identity-only categories (workflows, justfiles) are never returned here.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let category = match suffix {
            ".py" => Self::Python,
            ".js" => Self::JavaScript,
            ".jsx" => Self::Jsx,
            ".ts" => Self::TypeScript,
            ".tsx" => Self::Tsx,
            ".json" => Self::Json,
            ".css" => Self::Css,
            ".scss" => Self::Scss,
            ".html" => Self::Html,
            ".md" => Self::Markdown,
            ".go" => Self::Go,
            ".rs" => Self::Rust,
            ".rb" => Self::Ruby,
            ".php" => Self::Php,
            ".sh" => Self::Sh,
            ".bash" => Self::Bash,
            ".zsh" => Self::Zsh,
            ".yaml" => Self::Yaml,
            ".yml" => Self::Yml,
            ".toml" => Self::Toml,
            ".tf" => Self::Terraform,
            ".tfvars" => Self::TerraformVars,
            ".dockerfile" => Self::Dockerfile,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
