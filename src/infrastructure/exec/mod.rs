mod facts;

pub use facts::{RemoteHost, ServiceState, SystemInfo};

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed to pipe stdin to '{program}': {source}")]
    StdinPipe {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' failed on {target}: {detail}")]
    CommandFailed {
        command: String,
        target: String,
        detail: String,
    },
}

/// Captured output of one remote (or local) command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code, with -1 standing in for "killed by signal".
    pub fn rc(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    /// Stderr if non-empty, otherwise a note about the exit code.
    /// Used to build failure messages.
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit code {}", self.rc())
        } else {
            stderr.to_string()
        }
    }
}

/// The execution backend every check goes through: run one shell command
/// on a target and hand back its result. Implemented over SSH for remote
/// hosts and over a plain subprocess for the local machine; test doubles
/// implement it with canned outputs.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ExecError>;

    fn run_with_stdin(&self, command: &str, input: &str) -> Result<CommandOutput, ExecError>;

    /// Target name for log lines and failure messages.
    fn target(&self) -> &str;
}

/// Runs commands on a remote host through `ssh` in batch mode, so a
/// missing key or unknown host fails fast instead of prompting.
pub struct SshRunner {
    target: String,
    connect_timeout_secs: u32,
}

impl SshRunner {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            connect_timeout_secs: 10,
        }
    }

    fn command(&self, remote_command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.connect_timeout_secs))
            .arg(&self.target)
            .arg("--")
            .arg(remote_command);
        cmd
    }
}

impl CommandRunner for SshRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ExecError> {
        tracing::debug!(target = %self.target, %command, "running remote command");
        run_process(self.command(command), None)
    }

    fn run_with_stdin(&self, command: &str, input: &str) -> Result<CommandOutput, ExecError> {
        tracing::debug!(target = %self.target, %command, "running remote command with stdin");
        run_process(self.command(command), Some(input))
    }

    fn target(&self) -> &str {
        &self.target
    }
}

/// Runs commands on the machine dnscheck itself is invoked from.
pub struct LocalRunner;

impl CommandRunner for LocalRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ExecError> {
        tracing::debug!(%command, "running local command");
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        run_process(cmd, None)
    }

    fn run_with_stdin(&self, command: &str, input: &str) -> Result<CommandOutput, ExecError> {
        tracing::debug!(%command, "running local command with stdin");
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        run_process(cmd, Some(input))
    }

    fn target(&self) -> &str {
        "localhost"
    }
}

fn run_process(mut cmd: Command, input: Option<&str>) -> Result<CommandOutput, ExecError> {
    let program = cmd.get_program().to_string_lossy().to_string();

    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: program.clone(),
        source,
    })?;

    if let Some(input) = input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|source| ExecError::StdinPipe {
                    program: program.clone(),
                    source,
                })?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|source| ExecError::Spawn { program, source })?;

    Ok(CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_runner_captures_stdout() {
        let out = LocalRunner.run("echo hello").unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_local_runner_captures_exit_code() {
        let out = LocalRunner.run("exit 3").unwrap();
        assert!(!out.success());
        assert_eq!(out.rc(), 3);
    }

    #[test]
    fn test_local_runner_pipes_stdin() {
        let out = LocalRunner.run_with_stdin("cat", "piped input").unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "piped input");
    }

    #[test]
    fn test_detail_prefers_stderr() {
        let out = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "connection refused\n".to_string(),
        };
        assert_eq!(out.detail(), "connection refused");

        let silent = CommandOutput {
            exit_code: Some(9),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(silent.detail(), "exit code 9");
    }
}
