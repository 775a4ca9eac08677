//! Test runner
//!
//! Orchestrates running spec files — one after another, optionally from
//! inside each file's directory — and folds their results into [`Totals`].

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use crate::engine::Engine;
use crate::error::ScriptError;
use crate::exec::Executor;
use crate::stats::Totals;

/// Label used when the spec is read from standard input
pub const STDIN_LABEL: &str = "<STDIN>";

/// What a file that could not be entered with `-C` adds to the totals.
/// It shows up as one failed testcase out of one.
pub const CHDIR_PENALTY: (usize, usize) = (1, 1);

/// Configuration for the test runner
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// chdir into each spec file's directory while running it
    pub change_dir: bool,
    /// Ignore `#` / `DEBUG:` lines in actual output
    pub filter_debug: bool,
    /// Verbose per-testcase output
    pub verbose: bool,
}

/// The test runner
pub struct TestRunner {
    engine: Engine,
    config: RunConfig,
}

impl TestRunner {
    /// Create a new runner with the given config
    pub fn new(config: RunConfig) -> Self {
        Self::with_executor(Executor::new(), config)
    }

    /// Create a new runner that runs commands with a custom executor
    pub fn with_executor(executor: Executor, config: RunConfig) -> Self {
        let engine = Engine {
            executor,
            filter_debug: config.filter_debug,
            verbose: config.verbose,
        };
        Self { engine, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every file in order; with no files, read the spec from stdin.
    ///
    /// Prints a `TOTAL:` line when more than one input was processed.
    pub fn run_all(
        &self,
        files: &[PathBuf],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Totals, ScriptError> {
        let mut totals = Totals::default();

        if files.is_empty() {
            let stdin = std::io::stdin();
            totals.add(self.engine.run_stream(stdin.lock(), STDIN_LABEL, stdout, stderr)?);
            return Ok(totals);
        }

        for file in files {
            totals.add(self.run_file(file, stdout, stderr)?);
        }

        if totals.files > 1 {
            writeln!(stdout, "{}", totals.summary())?;
        }
        Ok(totals)
    }

    /// Run one spec file, returning `(failures, total)`.
    pub fn run_file(
        &self,
        path: &Path,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<(usize, usize), ScriptError> {
        let label = path.display().to_string();

        let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
        let (dir, name) = match (self.config.change_dir, dir, path.file_name()) {
            (true, Some(dir), Some(name)) => (dir, Path::new(name)),
            _ => return self.run_path(path, &label, stdout, stderr),
        };

        let prev = std::env::current_dir()?;
        if let Err(e) = std::env::set_current_dir(dir) {
            let err = ScriptError::chdir(format!("cannot change to {}: {}", dir.display(), e))
                .with_file(&label);
            tracing::warn!(%err, "skipping spec file");
            writeln!(stderr, "{}", err)?;
            return Ok(CHDIR_PENALTY);
        }
        tracing::debug!(dir = %dir.display(), "entered spec directory");

        let result = self.run_path(name, &label, stdout, stderr);

        std::env::set_current_dir(&prev).map_err(|e| {
            ScriptError::chdir(format!("cannot return to {}: {}", prev.display(), e))
                .with_file(&label)
        })?;
        result
    }

    fn run_path(
        &self,
        path: &Path,
        label: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<(usize, usize), ScriptError> {
        let file = File::open(path).map_err(|e| ScriptError::from(e).with_file(label))?;
        self.engine.run_stream(BufReader::new(file), label, stdout, stderr)
    }
}

/// Builder API for convenient test runner construction
#[derive(Default)]
pub struct TestRunnerBuilder {
    config: RunConfig,
    executor: Option<Executor>,
}

impl TestRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// chdir into each file's directory while running it
    pub fn change_dir(mut self, change_dir: bool) -> Self {
        self.config.change_dir = change_dir;
        self
    }

    /// Filter debug lines from actual output
    pub fn filter_debug(mut self, filter: bool) -> Self {
        self.config.filter_debug = filter;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Use a custom executor (e.g. another shell)
    pub fn executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Build and return the runner
    pub fn build(self) -> TestRunner {
        TestRunner::with_executor(self.executor.unwrap_or_default(), self.config)
    }
}

/// Convenience function: start building a runner
pub fn runner() -> TestRunnerBuilder {
    TestRunnerBuilder::new()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn write_spec(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_multi_file_aggregation() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_spec(tmp.path(), "a.t", "!echo a\n>a\n");
        let b = write_spec(tmp.path(), "b.t", "!echo b\n>b\n!echo c\n>nope\n");

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let totals = runner().build().run_all(&[a, b], &mut out, &mut err).unwrap();

        assert_eq!(totals.results(), (1, 3));
        assert!(!totals.all_passed());
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("a.t: OK (1 passed)\n"));
        assert!(out.contains("b.t: FAIL (1/2 failed)\n"));
        assert!(out.ends_with("TOTAL: FAIL (1/3 failed)\n"));
    }

    #[test]
    fn test_single_file_has_no_total_line() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write_spec(tmp.path(), "a.t", "!true\n");

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let totals = runner().build().run_all(&[a], &mut out, &mut err).unwrap();

        assert!(totals.all_passed());
        assert!(!String::from_utf8(out).unwrap().contains("TOTAL"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.t");

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let res = runner().build().run_all(&[missing], &mut out, &mut err);

        let e = res.unwrap_err();
        assert_eq!(e.kind, crate::error::ErrorKind::Io);
        assert!(e.file.unwrap().ends_with("missing.t"));
    }

    #[test]
    fn test_builder_sets_config() {
        let r = runner().change_dir(true).filter_debug(true).verbose(true).build();
        assert!(r.config().change_dir);
        assert!(r.config().filter_debug);
        assert!(r.config().verbose);
    }
}
