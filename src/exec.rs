//! Executor — run one testcase command through the shell

use std::io::Write;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use crate::codec::{block_to_lines, lines_to_block};
use crate::error::ScriptError;

/// What a command actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_status: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// Runs commands as `<shell> <flag> <command>`
#[derive(Debug, Clone)]
pub struct Executor {
    shell: String,
    flag: String,
}

impl Executor {
    /// The platform shell: `sh -c` on Unix, `cmd /C` on Windows.
    pub fn new() -> Self {
        #[cfg(windows)]
        return Self::with_shell("cmd", "/C");
        #[cfg(not(windows))]
        return Self::with_shell("sh", "-c");
    }

    /// Use another interpreter, e.g. `with_shell("bash", "-c")`.
    pub fn with_shell(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    /// Run `command`, feeding it `stdin` (one `\n` after every line), and
    /// collect both output channels and the exit status.
    ///
    /// Blocks until the child exits; there is no timeout. The child is
    /// always reaped before this returns.
    pub fn execute(&self, command: &str, stdin: &[String]) -> Result<ExecutionResult, ScriptError> {
        let input = lines_to_block(stdin);

        let mut cmd = ProcessCommand::new(&self.shell);
        cmd.arg(&self.flag).arg(command);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(shell = %self.shell, command, stdin_bytes = input.len(), "spawning");

        let mut child = cmd.spawn().map_err(|e| {
            ScriptError::spawn(format!("failed to execute '{}': {}", self.shell, e))
                .with_command(command)
        })?;

        // stdin is written on its own thread while both output pipes drain
        let writer = child.stdin.take().map(|mut pipe| {
            std::thread::spawn(move || -> std::io::Result<()> {
                match pipe.write_all(input.as_bytes()) {
                    // The child may exit without reading its input.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
                // pipe dropped here, closing the child's stdin
            })
        });

        let output = child.wait_with_output().map_err(|e| {
            ScriptError::spawn(format!("failed to wait for '{}': {}", self.shell, e))
                .with_command(command)
        })?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(res) => res.map_err(|e| {
                    ScriptError::from(e).with_command(command)
                })?,
                Err(_) => {
                    return Err(ScriptError::spawn("stdin writer panicked").with_command(command));
                }
            }
        }

        let exit_status = status_code(output.status);
        tracing::debug!(command, exit_status, "finished");

        Ok(ExecutionResult {
            exit_status,
            stdout: block_to_lines(&String::from_utf8_lossy(&output.stdout)),
            stderr: block_to_lines(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric exit status; a signal-killed child reports `128 + signal`
/// like the shell does.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    -1
}
