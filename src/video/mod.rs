pub mod ffmpeg;
pub mod plan;
pub mod probe;

use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to spawn {tool}. Is it installed?")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}:\n{stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),

    #[error("unreadable probe output for {path}: {reason}")]
    BadProbe { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run an external tool to completion, returning its stdout. A non-zero exit
/// carries the captured stderr in the error.
pub(crate) fn run_tool(tool: &'static str, args: &[String]) -> Result<Vec<u8>, VideoError> {
    let output = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| VideoError::Spawn { tool, source: e })?;

    if !output.status.success() {
        return Err(VideoError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}
