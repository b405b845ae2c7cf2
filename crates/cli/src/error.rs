//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: projection error (degenerate cell, point outside grid, bad dims)
//! - 11: I/O error (file read/write)
//! - 12: input error (bad strategy, bad warp, inconsistent files)
//! - 13: serialization error

use cartoflow_core::ProjectError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A projection-level error (degenerate cell, out-of-range vertex,
    /// invalid grid dimensions).
    Project(ProjectError),
    /// An I/O error (map or displacement file read, output write).
    Io(String),
    /// A user input error (unknown strategy or warp, inconsistent inputs).
    Input(String),
    /// A serialization error (JSON parse or output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Project(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Project(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ProjectError> for CliError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::Io(msg) => CliError::Io(msg),
            ProjectError::UnknownStrategy(name) => {
                CliError::Input(format!("unknown projection strategy: {name}"))
            }
            other => CliError::Project(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
