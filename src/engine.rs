//! Spec engine
//!
//! The Engine drives one spec stream end to end: classify each line, build
//! testcases, run them, compare the channels and keep the stats. It is
//! stateless config — one engine can run many streams. Everything that
//! changes while a stream is processed lives in a [`Context`] passed down
//! explicitly.

use std::io::{BufRead, Write};
use crate::compare;
use crate::error::ScriptError;
use crate::exec::Executor;
use crate::parser::{classify_line, LineEvent};
use crate::stats::RunStats;
use crate::testcase::{Pushed, TestCase, TestCaseBuilder};

/// Per-stream mutable state
struct Context<'a> {
    stats: RunStats<'a>,
    /// Malformed-line diagnostics go here, not to the report
    stderr: &'a mut dyn Write,
}

/// The spec engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Runs the testcase commands
    pub executor: Executor,
    /// Drop `#` / `DEBUG:` lines from actual output before comparing
    pub filter_debug: bool,
    /// Report passing testcases and echo comments
    pub verbose: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every testcase in `reader`, reporting under `label`.
    ///
    /// Returns `(failures, total)`. Per-testcase problems are reported and
    /// counted; only spawn failures and stream IO errors are returned.
    pub fn run_stream<R: BufRead>(
        &self,
        mut reader: R,
        label: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<(usize, usize), ScriptError> {
        let mut ctx = Context {
            stats: RunStats::new(label, self.verbose, stdout),
            stderr,
        };
        let mut builder = TestCaseBuilder::new();
        let mut bytes = Vec::new();

        loop {
            bytes.clear();
            if reader.read_until(b'\n', &mut bytes).map_err(|e| ScriptError::from(e).with_file(label))? == 0 {
                break;
            }
            // undecodable bytes become U+FFFD; the line is still classified
            let decoded = String::from_utf8_lossy(&bytes);
            let line = decoded.trim_start();
            let event = classify_line(line);
            tracing::debug!(line = builder.line_number() + 1, ?event, "classified");

            let is_echo = self.verbose && event == LineEvent::Ignore;
            match builder.push(event) {
                Pushed::Nothing => {}
                Pushed::Ready(tc) => self.run_testcase(&mut ctx, tc)?,
                Pushed::Rejected(err) => {
                    writeln!(ctx.stderr, "{}", err.with_file(label))?;
                }
            }
            if is_echo {
                ctx.stats.line(line.trim_end())?;
            }
        }

        if let Some(tc) = builder.finish() {
            self.run_testcase(&mut ctx, tc)?;
        }

        ctx.stats.summary()?;
        Ok(ctx.stats.results())
    }

    /// Run one testcase and close it in the stats.
    fn run_testcase(&self, ctx: &mut Context<'_>, tc: TestCase) -> Result<(), ScriptError> {
        tracing::debug!(index = ctx.stats.index(), line = tc.line_number, command = %tc.command, "testcase");

        if tc.malformed {
            ctx.stats.fail(&format!("malformed testcase at line {}, not executed", tc.line_number))?;
            ctx.stats.advance()?;
            return Ok(());
        }

        if self.verbose {
            ctx.stats.record_message(&format!("!{}", tc.command))?;
        }

        let result = self.executor.execute(&tc.command, &tc.stdin).map_err(|e| {
            let label = ctx.stats.file().to_string();
            e.with_location(label, tc.line_number)
        })?;

        compare::check(&mut ctx.stats, "stdout", &tc.command, &result.stdout, &tc.stdout, self.filter_debug)?;
        compare::check(&mut ctx.stats, "stderr", &tc.command, &result.stderr, &tc.stderr, self.filter_debug)?;
        compare::check_status(&mut ctx.stats, &tc.command, result.exit_status, tc.exit_status)?;

        ctx.stats.advance()?;
        Ok(())
    }
}
