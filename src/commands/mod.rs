//! Command handlers for the taidy CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod run;
pub mod tools;
pub mod version;
