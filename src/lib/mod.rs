//! Shared library modules providing error types, exit handling, process helpers, and telemetry initialization.

pub mod errors;
pub mod exit;
pub mod paths;
pub mod process;
pub mod telemetry;
