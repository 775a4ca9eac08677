//! emx-shelltest: a declarative shell-command test runner
//!
//! A spec file lists testcases. Each one is a shell command, the lines to
//! feed to its stdin, and the stdout, stderr and exit status it must
//! produce. The runner executes every command through `sh -c`, compares
//! the three channels and prints a positional diff for each mismatch.
//!
//! # Spec Syntax
//!
//! ```text
//! # leading whitespace is ignored
//! !sort
//! <banana
//! <apple
//! >apple
//! >banana
//!
//! !ls /nonexistent
//! /ls: cannot access '/nonexistent': No such file or directory
//! ?2
//! ```
//!
//! # Markers
//!
//! | Marker | Description |
//! |--------|-------------|
//! | `!cmd` | Start a testcase running `cmd` |
//! | `<text` | Append a line to the command's stdin |
//! | `>text` | Append an expected stdout line |
//! | `/text` | Append an expected stderr line |
//! | `?N` | Expected exit status (default 0, last one wins) |
//! | `#...` | Comment (blank lines are ignored too) |
//!
//! Any other first character makes the line malformed: its testcase is
//! reported as failed without running.
//!
//! # Debug lines
//!
//! With debug filtering on, actual output lines starting with `#` or
//! `DEBUG:` are skipped before comparing.

mod codec;
mod compare;
mod engine;
mod error;
mod exec;
mod parser;
mod runner;
mod selftest;
mod stats;
mod testcase;

pub use codec::{lines_to_block, block_to_lines};
pub use compare::{check, check_status, is_debug_line};
pub use engine::Engine;
pub use error::{ScriptError, ErrorKind};
pub use exec::{Executor, ExecutionResult};
pub use parser::{LineEvent, classify_line};
pub use runner::{TestRunner, RunConfig, TestRunnerBuilder, runner, STDIN_LABEL, CHDIR_PENALTY};
pub use selftest::run_selftest;
pub use stats::{RunStats, Totals};
pub use testcase::{TestCase, TestCaseBuilder, Pushed, DEFAULT_EXIT_STATUS};
