use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{tool} could not be started (looked for '{program}'): {source}")]
    ToolNotFound {
        tool: &'static str,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Expected output was not created: {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("Refusing to overwrite existing file: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Could not determine image format of {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Recovery failed for {}: {reason}", .path.display())]
    RecoveryFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
