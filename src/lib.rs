//! Library crate root shared by the `run-pipeline` and `serve-model` launchers.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod server;
