use log::debug;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::error::{ConvertError, ConvertResult};

/// Runs a tool to completion and hands back its output whatever the exit status.
///
/// Only a failure to spawn is an error here; callers that treat a non-zero
/// exit as a result (corruption checks) inspect `output.status` themselves.
pub async fn capture<I, S>(tool: &'static str, program: &str, args: I) -> ConvertResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("{}: {:?}", tool, command.as_std());

    command
        .output()
        .await
        .map_err(|e| spawn_error(tool, program, e))
}

/// Runs a tool and fails with `ToolFailed` on a non-zero exit
pub async fn run_tool<I, S>(tool: &'static str, program: &str, args: I) -> ConvertResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = capture(tool, program, args).await?;

    if !output.status.success() {
        return Err(ConvertError::ToolFailed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

/// Checks that a tool can be started at all. The exit status is ignored
/// since not every tool agrees on what a version flag returns.
pub async fn probe(tool: &'static str, program: &str, version_arg: &str) -> ConvertResult<()> {
    capture(tool, program, [version_arg]).await.map(|_| ())
}

fn spawn_error(tool: &'static str, program: &str, error: std::io::Error) -> ConvertError {
    match error.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => ConvertError::ToolNotFound {
            tool,
            program: program.to_string(),
            source: error,
        },
        _ => ConvertError::Io(error),
    }
}
