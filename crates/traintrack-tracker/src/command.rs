//! Shell-command execution with captured output.

use std::process::Command;

use traintrack_core::{Result, TrackError};

/// Captured output of a completed shell command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
}

/// Run a shell command and capture its output.
///
/// The command line is passed to `sh -c`, so pipelines and redirections
/// work. A non-zero exit status is logged with the captured stderr and
/// returned as [`TrackError::Command`]; callers decide whether that aborts
/// the run.
///
/// # Errors
///
/// Returns an error if the shell cannot be spawned or the command exits
/// with a non-zero status.
pub fn run_command(command: &str) -> Result<CommandOutput> {
    tracing::debug!(command, "running shell command");

    let output = Command::new("sh").arg("-c").arg(command).output()?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        tracing::error!(
            command,
            code = ?output.status.code(),
            stderr = %stderr,
            "shell command failed"
        );
        return Err(TrackError::Command {
            command: command.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command_captures_stdout() {
        let output = run_command("echo hello").unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_pipeline_commands_work() {
        let output = run_command("printf 'a\\nb\\nc\\n' | wc -l").unwrap();
        assert_eq!(output.stdout.trim(), "3");
    }

    #[test]
    fn test_failing_command_returns_error() {
        let err = run_command("false").unwrap_err();
        match err {
            TrackError::Command { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failure_carries_exit_code_and_stderr() {
        let err = run_command("echo oops >&2; exit 3").unwrap_err();
        match err {
            TrackError::Command {
                command,
                code,
                stderr,
            } => {
                assert!(command.contains("exit 3"));
                assert_eq!(code, Some(3));
                assert!(stderr.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
