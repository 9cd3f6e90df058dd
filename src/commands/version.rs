//! Handler for the `version` command.

/// Print version information, plus build metadata when the build provided it.
pub fn handle_version() {
    println!("taidy {}", env!("CARGO_PKG_VERSION"));
    if let Some(commit) = option_env!("TAIDY_GIT_COMMIT") {
        println!("Git commit: {commit}");
    }
    if let Some(date) = option_env!("TAIDY_BUILD_DATE") {
        println!("Built: {date}");
    }
}
