use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use taidy_lib::config::ConfigSource;
use taidy_lib::executor::CancellationToken;
use taidy_lib::exit_codes::{self, exit};
use taidy_lib::tools::Operation;

mod commands;

use commands::run::{RunContext, handle_run};

const LINT_ONLY: &[Operation] = &[Operation::Lint];
const FORMAT_ONLY: &[Operation] = &[Operation::Format];
const LINT_AND_FORMAT: &[Operation] = &Operation::ALL;

const LONG_ABOUT: &str = "\
Run the right linters and formatters for every file you give it.

taidy picks, per file type, the first installed tool from a built-in
preference list and runs it. Tools that handle several file types are run
once over all of their files.

DIRECTORIES:
  Directories are searched recursively. Common build and dependency folders
  (.git, node_modules, __pycache__, dist, build, .venv, ...) are skipped.

SUPPORTED FILES:
  Python, JavaScript/JSX, TypeScript/TSX, JSON, CSS, SCSS, HTML, Markdown,
  Go, Rust, Ruby, PHP, Shell (sh/bash/zsh), YAML, TOML, Terraform,
  Dockerfile, GitHub Actions workflows, justfile.
  Run `taidy tools` to see every tool chain and what is installed.

CONFIGURATION:
  .taidy.json in the current directory or any parent (up to the git root):
    { \"ignore\": [\"vendor/**\", \"*.generated.*\"] }";

#[derive(Parser)]
#[command(
    name = "taidy",
    author,
    version,
    about = "Run the right linters and formatters for every file",
    long_about = LONG_ABOUT,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Files or directories to lint and format
    paths: Vec<String>,

    /// Path to a .taidy.json configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore any configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    no_config: bool,

    /// Only print warnings, errors and tool output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Maximum number of tools to run at once (default: number of CPUs)
    #[arg(short = 'j', long, global = true, value_name = "N")]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint files without modifying them
    Lint {
        /// Files or directories to lint
        paths: Vec<String>,
    },
    /// Format files in place
    Format {
        /// Files or directories to format
        paths: Vec<String>,
    },
    /// List tool chains and which tool is selected on this machine
    Tools,
    /// Show version information
    Version,
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn print_usage() {
    let mut cmd = Cli::command();
    eprintln!("{}", cmd.render_usage());
    eprintln!("\nRun 'taidy --help' for more information.");
}

fn install_interrupt_handler(token: &CancellationToken) {
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Failed to install interrupt handler: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let (paths, operations): (&[String], &[Operation]) = match &cli.command {
        Some(Commands::Tools) => {
            commands::tools::handle_tools();
            exit::success();
        }
        Some(Commands::Version) => {
            commands::version::handle_version();
            exit::success();
        }
        Some(Commands::Lint { paths }) => (paths.as_slice(), LINT_ONLY),
        Some(Commands::Format { paths }) => (paths.as_slice(), FORMAT_ONLY),
        None => (cli.paths.as_slice(), LINT_AND_FORMAT),
    };

    if paths.is_empty() {
        print_usage();
        exit::general_error();
    }

    let config_source = if cli.no_config {
        ConfigSource::Disabled
    } else if let Some(path) = &cli.config {
        ConfigSource::Explicit(path.clone())
    } else {
        match std::env::current_dir() {
            Ok(dir) => ConfigSource::Discover(dir),
            Err(e) => {
                log::warn!("Cannot determine current directory, skipping config discovery: {e}");
                ConfigSource::Disabled
            }
        }
    };

    let token = CancellationToken::new();
    install_interrupt_handler(&token);

    let ctx = RunContext {
        config_source,
        jobs: cli.jobs,
        quiet: cli.quiet,
        token,
    };

    match handle_run(paths, operations, &ctx) {
        Ok(exit_codes::INTERRUPTED) => exit::interrupted(),
        Ok(code) => exit::with_code(code),
        Err(e) => {
            log::error!("{e:#}");
            exit::general_error();
        }
    }
}
