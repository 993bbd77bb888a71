//! Argument validation and forwarding to the external NewsLetter pipeline.
mod executor;
mod request;

pub use executor::{build_pipeline_command, outcome_message, run_pipeline};
pub use request::{is_business_date, today, PipelineRequest};
