/// Exit codes for taidy, following shell conventions
///
/// Besides these, a run exits with the last non-zero status reported by any
/// external tool, passed through unchanged.
/// Success - every tool succeeded, or there was nothing to do
pub const SUCCESS: i32 = 0;

/// General error - a tool could not be started, or taidy itself failed
pub const GENERAL_ERROR: i32 = 1;

/// Command not found - a selected tool disappeared between lookup and spawn
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Interrupted - the run was cancelled by SIGINT
pub const INTERRUPTED: i32 = 130;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{GENERAL_ERROR, INTERRUPTED, SUCCESS};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with general error code (1)
    pub fn general_error() -> ! {
        std::process::exit(GENERAL_ERROR);
    }

    /// Exit with interrupted code (130)
    pub fn interrupted() -> ! {
        std::process::exit(INTERRUPTED);
    }

    /// Exit with an arbitrary code, such as one passed through from a tool
    pub fn with_code(code: i32) -> ! {
        std::process::exit(code);
    }
}
