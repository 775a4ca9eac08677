//! Runner errors

use std::fmt;

/// The kind of runner error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized marker, bad `?` value, or content before the first command
    Malformed,
    /// The shell could not be spawned or waited on
    Spawn,
    /// Changing into a spec file's directory failed
    Chdir,
    /// IO error reading a spec stream or writing the report
    Io,
}

/// An error with file/line context
#[derive(Debug)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub command: Option<String>,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: None,
            command: None,
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_command(mut self, cmd: impl Into<String>) -> Self {
        self.command = Some(cmd.into());
        self
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, msg)
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Spawn, msg)
    }

    pub fn chdir(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Chdir, msg)
    }

    pub fn is_spawn(&self) -> bool {
        self.kind == ErrorKind::Spawn
    }
}

impl fmt::Display for ScriptError {
    /// `file:line: command: message`, leaving out whatever is unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location: Vec<String> = self.file.iter().cloned()
            .chain(self.line.map(|l| l.to_string()))
            .collect();
        if !location.is_empty() {
            write!(f, "{}: ", location.join(":"))?;
        }
        if let Some(ref cmd) = self.command {
            write!(f, "{}: ", cmd)?;
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScriptError {}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}
