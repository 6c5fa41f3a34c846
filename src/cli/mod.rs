//! # Command-Line Interface
//!
//! Two ways in, both thin layers over the same engine:
//!
//! - **Subcommands** (`agenda add`, `agenda finish 0`, …) for one-shot
//!   use; each maps onto a single store mutation and saves immediately.
//! - **Interactive menu** on a bare invocation: the pending/finished
//!   views of the original terminal planner, with a save prompt on quit.
//!
//! Call [`run()`] to parse arguments and execute.

mod app;
mod menu;
mod output;

pub use app::{run, Cli, Commands};
