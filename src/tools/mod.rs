//! External tool registry and availability checks.
//!
//! taidy never lints or formats anything itself. For each file category it
//! keeps an ordered chain of external tools per operation:
//!
//! - **Lint** (`taidy lint`): e.g. `ruff check` → `uvx ruff check` → `black --check` → ...
//! - **Format** (`taidy format`): e.g. `ruff format` → `uvx ruff format` → `black`
//!
//! The first tool in a chain that is installed is used; the rest are not
//! consulted. Availability is decided by a [`ToolOracle`], normally a
//! [`PathOracle`] that searches `PATH` once per executable name.
//!
//! See `taidy tools` for the full table and what is selected on the current
//! machine.

pub mod availability;
pub mod registry;

pub use availability::{PathOracle, StaticOracle, ToolOracle};
pub use registry::{FileArgs, Invocation, Operation, ToolDescriptor, chain_for, has_chain, select};
