//! Exit reporting shared by both launcher binaries.

use std::process::ExitCode;

use anyhow::Error;

/// Exit status used for validation, usage, and launch failures.
pub const FAILURE_CODE: u8 = 1;

/// Bundles an error message with the exit code the process should terminate with.
#[derive(Debug)]
pub struct LaunchExit {
    message: Option<String>,
    code: u8,
}

impl LaunchExit {
    /// Any launcher error: printed to stderr, exit status 1.
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: Some(err.to_string()),
            code: FAILURE_CODE,
        }
    }

    /// A child process finished unsuccessfully; its code is passed through as-is.
    pub fn child(code: u8) -> Self {
        Self {
            message: None,
            code,
        }
    }

    /// Map a clap parse failure: help/version output exits 0, everything else prints usage and exits 1.
    pub fn usage(err: clap::Error) -> Self {
        let code = if err.use_stderr() { FAILURE_CODE } else { 0 };
        Self {
            message: Some(err.render().to_string()),
            code,
        }
    }

    pub fn report(self) -> ExitCode {
        if let Some(message) = self.message {
            if self.code == 0 {
                print!("{message}");
            } else {
                eprintln!("{}", message.trim_end());
            }
        }
        ExitCode::from(self.code)
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
