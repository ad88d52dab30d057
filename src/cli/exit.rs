use std::process::ExitCode;

use anyhow::Error;

use crate::lib::output;

/// Bundles a fatal error message with the exit code to report it with.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:#}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        output::print_error(&self.message);
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
