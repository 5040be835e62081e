//! Command-line interface for the `routewarden-lint` binary.

mod commands;

pub use commands::{run_cli, Cli, Commands, ReportFormat};
