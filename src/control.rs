//! Invocation of the platform control program (`start`, `launchctl`, `systemctl`)

use std::fmt;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

/// A one-shot command line for the init system's control program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ControlCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}{}", format_stderr(.stderr))]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Run a control command to completion
///
/// stdout is discarded; stderr is captured for the error message.
pub async fn run(command: &ControlCommand) -> Result<(), ControlError> {
    log::debug!("Running {}", command);

    let output = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| ControlError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ControlError::Failed {
            command: command.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cmd = ControlCommand::new("launchctl", ["load", "/Library/LaunchDaemons/x.plist"]);
        assert_eq!(cmd.to_string(), "launchctl load /Library/LaunchDaemons/x.plist");
    }

    #[tokio::test]
    async fn test_run_success() {
        let cmd = ControlCommand::new("/bin/sh", ["-c", "exit 0"]);
        tokio_test::assert_ok!(run(&cmd).await);
    }

    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let cmd = ControlCommand::new("/bin/sh", ["-c", "echo nope >&2; exit 3"]);
        match run(&cmd).await {
            Err(ControlError::Failed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "nope");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let cmd = ControlCommand::new("/nonexistent/nativesvc-ctl", Vec::<String>::new());
        let err = run(&cmd).await.unwrap_err();
        assert!(matches!(err, ControlError::Spawn { .. }));
    }
}
