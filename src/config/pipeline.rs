use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_SCRIPT: &str = "scripts/main.py";
/// Pipeline types accepted by the NewsLetter entry point.
pub const DEFAULT_PIPELINE_TYPES: &[&str] = &["ra_summary", "bs_summary"];

/// How the external pipeline program is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSection {
    pub interpreter: String,
    pub script: PathBuf,
    pub working_dir: Option<PathBuf>,
    /// Empty disables the pipeline type check.
    pub pipeline_types: Vec<String>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            working_dir: None,
            pipeline_types: DEFAULT_PIPELINE_TYPES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawPipelineSection {
    pub interpreter: Option<String>,
    pub script: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub pipeline_types: Option<Vec<String>>,
}

pub fn parse_pipeline_section(
    raw: Option<RawPipelineSection>,
    path: &Path,
) -> Result<PipelineSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = PipelineSection::default();

    let interpreter = raw.interpreter.unwrap_or(defaults.interpreter);
    if interpreter.trim().is_empty() {
        return Err(invalid(path, "pipeline.interpreter", "must not be empty"));
    }

    let script = raw.script.unwrap_or(defaults.script);
    if script.as_os_str().is_empty() {
        return Err(invalid(path, "pipeline.script", "must not be empty"));
    }

    let pipeline_types = raw.pipeline_types.unwrap_or(defaults.pipeline_types);
    if pipeline_types.iter().any(|name| name.trim().is_empty()) {
        return Err(invalid(
            path,
            "pipeline.pipeline_types",
            "entries must not be empty",
        ));
    }

    Ok(PipelineSection {
        interpreter,
        script,
        working_dir: raw.working_dir.filter(|dir| !dir.as_os_str().is_empty()),
        pipeline_types,
    })
}

fn invalid(path: &Path, field: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: message.into(),
    }
}
