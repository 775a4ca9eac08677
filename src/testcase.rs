//! Testcase records and the builder that accumulates them
//!
//! The builder consumes one [`LineEvent`] per input line. A `!` line
//! flushes the testcase collected so far and starts the next one; the
//! last testcase is flushed by [`TestCaseBuilder::finish`].

use crate::error::ScriptError;
use crate::parser::LineEvent;

/// Exit status expected when a testcase has no `?` line.
pub const DEFAULT_EXIT_STATUS: i32 = 0;

/// One command invocation plus what it is expected to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Shell command, trimmed. Empty for content that preceded any `!` line.
    pub command: String,
    /// Lines fed to the command's stdin
    pub stdin: Vec<String>,
    /// Expected stdout lines
    pub stdout: Vec<String>,
    /// Expected stderr lines
    pub stderr: Vec<String>,
    /// Expected exit status
    pub exit_status: i32,
    /// Set when any line of the testcase failed to parse; the testcase is
    /// reported failed without running
    pub malformed: bool,
    /// Line of the `!` directive (or of the first stray line)
    pub line_number: usize,
}

impl TestCase {
    pub fn new(command: impl Into<String>, line_number: usize) -> Self {
        Self {
            command: command.into(),
            stdin: Vec::new(),
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_status: DEFAULT_EXIT_STATUS,
            malformed: false,
            line_number,
        }
    }
}

/// Outcome of feeding one line to the builder
#[derive(Debug)]
pub enum Pushed {
    /// Line absorbed, nothing to report
    Nothing,
    /// A `!` line closed the previous testcase
    Ready(TestCase),
    /// The line was rejected; the current testcase is now malformed
    Rejected(ScriptError),
}

/// Accumulates classified lines into testcases
pub struct TestCaseBuilder {
    current: TestCase,
    /// Whether a `!` line has been seen for `current`
    started: bool,
    line_number: usize,
}

impl TestCaseBuilder {
    pub fn new() -> Self {
        Self {
            current: TestCase::new("", 0),
            started: false,
            line_number: 0,
        }
    }

    /// Number of lines consumed so far (the 1-based number of the last line).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consume the next line's event.
    pub fn push(&mut self, event: LineEvent) -> Pushed {
        self.line_number += 1;
        let line = self.line_number;

        let marker = event.marker();
        match event {
            LineEvent::Command(cmd) => {
                let next = TestCase::new(cmd.trim(), line);
                let prev = std::mem::replace(&mut self.current, next);
                let was_pending = self.started || prev.malformed;
                self.started = true;
                if was_pending {
                    return Pushed::Ready(prev);
                }
                Pushed::Nothing
            }
            LineEvent::Ignore => Pushed::Nothing,
            LineEvent::Malformed(_) => self.reject(line, format!(
                "unrecognized marker '{}'",
                marker.unwrap_or(' '),
            )),
            LineEvent::BadExitStatus(raw) => {
                self.reject(line, format!("invalid exit status '{}'", raw.trim()))
            }
            _ if !self.started => self.reject(line, format!(
                "'{}' line before first command",
                marker.unwrap_or(' '),
            )),
            LineEvent::StdinLine(text) => {
                self.current.stdin.push(text);
                Pushed::Nothing
            }
            LineEvent::StdoutLine(text) => {
                self.current.stdout.push(text);
                Pushed::Nothing
            }
            LineEvent::StderrLine(text) => {
                self.current.stderr.push(text);
                Pushed::Nothing
            }
            LineEvent::ExitStatus(n) => {
                self.current.exit_status = n;
                Pushed::Nothing
            }
        }
    }

    /// End of stream: return the pending testcase, if there is one.
    pub fn finish(self) -> Option<TestCase> {
        if self.started || self.current.malformed {
            Some(self.current)
        } else {
            None
        }
    }

    fn reject(&mut self, line: usize, message: String) -> Pushed {
        if !self.started && !self.current.malformed {
            self.current.line_number = line;
        }
        self.current.malformed = true;
        Pushed::Rejected(ScriptError::malformed(message).with_line(line))
    }
}

impl Default for TestCaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
