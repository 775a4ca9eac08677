//! Per-file testcase statistics and the cross-file totals
//!
//! [`RunStats`] is the single place the report goes through: every
//! per-testcase diagnostic is tagged with the file label and the current
//! testcase index and written immediately.

use std::io::{self, Write};

/// Pass/fail bookkeeping for one spec stream
pub struct RunStats<'a> {
    file: String,
    /// 1-based index of the testcase being run
    index: usize,
    failures: usize,
    failed: bool,
    verbose: bool,
    out: &'a mut dyn Write,
}

impl<'a> RunStats<'a> {
    pub fn new(file: impl Into<String>, verbose: bool, out: &'a mut dyn Write) -> Self {
        Self {
            file: file.into(),
            index: 1,
            failures: 0,
            failed: false,
            verbose,
            out,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the current testcase has failed so far.
    pub fn current_failed(&self) -> bool {
        self.failed
    }

    /// Write a raw report line (diff rows, echoed comments).
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Print a diagnostic for the current testcase.
    pub fn record_message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} #{}: {}", self.file, self.index, text)
    }

    /// Mark the current testcase failed. Several failures in one testcase
    /// still count once.
    pub fn fail(&mut self, reason: &str) -> io::Result<()> {
        self.failed = true;
        self.record_message(&format!("FAIL: {}", reason))
    }

    /// Close the current testcase and move to the next one.
    pub fn advance(&mut self) -> io::Result<()> {
        if self.failed {
            self.record_message("FAILED")?;
            self.failures += 1;
        } else if self.verbose {
            self.record_message("ok")?;
        }
        self.index += 1;
        self.failed = false;
        Ok(())
    }

    /// Print the per-file result line.
    pub fn summary(&mut self) -> io::Result<()> {
        let (failures, total) = self.results();
        writeln!(self.out, "{}: {}", self.file, verdict(failures, total))
    }

    /// `(failures, total)` for aggregation.
    pub fn results(&self) -> (usize, usize) {
        (self.failures, self.index - 1)
    }
}

/// `OK (n passed)` or `FAIL (f/n failed)`.
fn verdict(failures: usize, total: usize) -> String {
    if failures == 0 {
        format!("OK ({} passed)", total)
    } else {
        format!("FAIL ({}/{} failed)", failures, total)
    }
}

/// Failures and testcases summed over every processed input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub failures: usize,
    pub total: usize,
    /// Number of inputs folded in
    pub files: usize,
}

impl Totals {
    /// Fold in one file's `(failures, total)`.
    pub fn add(&mut self, (failures, total): (usize, usize)) {
        self.failures += failures;
        self.total += total;
        self.files += 1;
    }

    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }

    pub fn results(&self) -> (usize, usize) {
        (self.failures, self.total)
    }

    /// Format the aggregate line printed after several inputs.
    pub fn summary(&self) -> String {
        format!("TOTAL: {}", verdict(self.failures, self.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buf: &[u8]) -> String {
        String::from_utf8_lossy(buf).into_owned()
    }

    #[test]
    fn test_all_pass_quiet() {
        let mut buf: Vec<u8> = Vec::new();
        let mut stats = RunStats::new("a.t", false, &mut buf);
        stats.advance().unwrap();
        stats.advance().unwrap();
        assert_eq!(stats.results(), (0, 2));
        stats.summary().unwrap();
        assert_eq!(text(&buf), "a.t: OK (2 passed)\n");
    }

    #[test]
    fn test_verbose_reports_passes() {
        let mut buf: Vec<u8> = Vec::new();
        let mut stats = RunStats::new("a.t", true, &mut buf);
        stats.advance().unwrap();
        assert_eq!(text(&buf), "a.t #1: ok\n");
    }

    #[test]
    fn test_fail_is_idempotent_per_testcase() {
        let mut buf: Vec<u8> = Vec::new();
        let mut stats = RunStats::new("b.t", false, &mut buf);
        stats.fail("stdout differs").unwrap();
        stats.fail("exit status 1, expected 0").unwrap();
        assert!(stats.current_failed());
        stats.advance().unwrap();
        assert!(!stats.current_failed());
        stats.advance().unwrap();
        assert_eq!(stats.results(), (1, 2));
        assert_eq!(stats.index(), 3);
        stats.summary().unwrap();
        assert_eq!(
            text(&buf),
            "b.t #1: FAIL: stdout differs\n\
             b.t #1: FAIL: exit status 1, expected 0\n\
             b.t #1: FAILED\n\
             b.t: FAIL (1/2 failed)\n"
        );
    }

    #[test]
    fn test_empty_stream_summary() {
        let mut buf: Vec<u8> = Vec::new();
        let mut stats = RunStats::new("<STDIN>", false, &mut buf);
        assert_eq!(stats.results(), (0, 0));
        stats.summary().unwrap();
        assert_eq!(text(&buf), "<STDIN>: OK (0 passed)\n");
    }

    #[test]
    fn test_totals_aggregate() {
        let mut totals = Totals::default();
        totals.add((0, 1));
        totals.add((1, 2));
        assert_eq!(totals.results(), (1, 3));
        assert_eq!(totals.files, 2);
        assert!(!totals.all_passed());
        assert_eq!(totals.summary(), "TOTAL: FAIL (1/3 failed)");
    }

    #[test]
    fn test_totals_all_passed() {
        let mut totals = Totals::default();
        totals.add((0, 4));
        assert!(totals.all_passed());
        assert_eq!(totals.summary(), "TOTAL: OK (4 passed)");
    }
}
