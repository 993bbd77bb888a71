//! CLI entrypoint module structure.
use std::ffi::OsString;

use clap::Parser;

use crate::lib::exit::LaunchExit;

pub mod args;
pub mod profile;

pub use args::{PipelineArgs, ServeArgs};
pub use profile::{
    ServeProfile, DEFAULT_GPU_MEMORY_UTILIZATION, DEFAULT_HOST, DEFAULT_MAX_MODEL_LEN,
    DEFAULT_MODEL, DEFAULT_PORT,
};

/// Parse arguments, turning clap failures into a `LaunchExit` instead of clap's own exit.
pub fn parse_args<T, I, A>(args: I) -> Result<T, LaunchExit>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(LaunchExit::usage)
}
