use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::export::domain::clipboard::ClipboardSink;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard command available (tried: {tried})")]
    NoBackend { tried: String },
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write to {command} stdin: {source}")]
    Pipe {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}")]
    Exited { command: String, status: ExitStatus },
}

/// Pipes text to the first available system clipboard command.
///
/// Candidate order favors Wayland, then X11, then the macOS and Windows
/// built-ins. A candidate whose binary is missing is skipped; any other
/// failure is reported as-is.
pub struct CommandClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl CommandClipboard {
    pub fn system() -> Self {
        Self::with_candidates(vec![
            ("wl-copy".to_string(), vec![]),
            (
                "xclip".to_string(),
                vec!["-selection".to_string(), "clipboard".to_string()],
            ),
            (
                "xsel".to_string(),
                vec!["--clipboard".to_string(), "--input".to_string()],
            ),
            ("pbcopy".to_string(), vec![]),
            ("clip".to_string(), vec![]),
        ])
    }

    pub fn with_candidates(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }
}

fn pipe_to(command: &str, args: &[String], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ClipboardError::Spawn {
            command: command.to_string(),
            source,
        })?;

    // Write, then drop stdin so the child sees EOF. The child is always
    // reaped, even when the write fails mid-pipe.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait().map_err(|source| ClipboardError::Spawn {
        command: command.to_string(),
        source,
    })?;
    written.map_err(|source| ClipboardError::Pipe {
        command: command.to_string(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Exited {
            command: command.to_string(),
            status,
        })
    }
}

impl ClipboardSink for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        for (command, args) in &self.candidates {
            match pipe_to(command, args, text) {
                Ok(()) => {
                    log::debug!("copied {} bytes via {command}", text.len());
                    return Ok(());
                }
                Err(ClipboardError::Spawn { ref source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        let tried = self
            .candidates
            .iter()
            .map(|(command, _)| command.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ClipboardError::NoBackend { tried }.into())
    }
}
