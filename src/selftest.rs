//! Built-in self-test (`-T`)
//!
//! Exercises the codec, the classifier and a handful of end-to-end specs
//! on the machine the runner is installed on, so a broken shell setup is
//! noticed before real spec files are blamed.

use std::io::Write;
use crate::codec::{block_to_lines, lines_to_block};
use crate::engine::Engine;
use crate::error::ScriptError;
use crate::parser::{classify_line, LineEvent};
use crate::stats::RunStats;

/// An end-to-end spec and the `(failures, total)` it must produce
struct SpecCheck {
    name: &'static str,
    spec: &'static str,
    filter_debug: bool,
    expect: (usize, usize),
}

const SPEC_CHECKS: &[SpecCheck] = &[
    SpecCheck { name: "echo", spec: "!echo hello\n>hello\n?0\n", filter_debug: false, expect: (0, 1) },
    SpecCheck { name: "exit-status", spec: "!exit 3\n?3\n", filter_debug: false, expect: (0, 1) },
    SpecCheck { name: "mismatch", spec: "!echo wrong\n>right\n?0\n", filter_debug: false, expect: (1, 1) },
    SpecCheck { name: "comments-only", spec: "# nothing\n\n", filter_debug: false, expect: (0, 0) },
    SpecCheck { name: "stdin", spec: "!cat\n<in\n>in\n", filter_debug: false, expect: (0, 1) },
    SpecCheck { name: "malformed", spec: "!true\n%x\n", filter_debug: false, expect: (1, 1) },
    SpecCheck { name: "debug-filter", spec: "!echo '#n'; echo ok\n>ok\n", filter_debug: true, expect: (0, 1) },
    SpecCheck { name: "debug-unfiltered", spec: "!echo '#n'; echo ok\n>ok\n", filter_debug: false, expect: (1, 1) },
];

/// Run all self-test checks, reporting through `stdout`. Returns whether
/// every check passed.
pub fn run_selftest(engine: &Engine, verbose: bool, stdout: &mut dyn Write) -> Result<bool, ScriptError> {
    let mut stats = RunStats::new("selftest", verbose, stdout);

    for (name, ok) in unit_checks() {
        if !ok {
            stats.fail(name)?;
        }
        stats.advance()?;
    }

    for check in SPEC_CHECKS {
        let engine = Engine {
            filter_debug: check.filter_debug,
            verbose: false,
            ..engine.clone()
        };
        let mut sink = std::io::sink();
        let mut errs = std::io::sink();
        let got = engine.run_stream(check.spec.as_bytes(), check.name, &mut sink, &mut errs)?;
        if got != check.expect {
            stats.fail(&format!("{}: got {:?}, expected {:?}", check.name, got, check.expect))?;
        }
        stats.advance()?;
    }

    stats.summary()?;
    Ok(stats.results().0 == 0)
}

/// Pure checks that need no child process.
fn unit_checks() -> Vec<(&'static str, bool)> {
    let samples: [&[&str]; 4] = [&[], &[""], &["a", "b"], &["", "x", ""]];
    let round_trip = samples
        .iter()
        .all(|&lines| block_to_lines(&lines_to_block(lines)) == lines);
    let none: [&str; 0] = [];

    vec![
        ("codec round trip", round_trip),
        ("codec empty block", lines_to_block(&none).is_empty() && block_to_lines("").is_empty()),
        ("codec single newline", block_to_lines("\n") == vec![String::new()]),
        ("classify command", classify_line("!echo hi") == LineEvent::Command("echo hi".into())),
        ("classify status", classify_line("?0") == LineEvent::ExitStatus(0)),
        ("classify malformed", classify_line("@x") == LineEvent::Malformed("@x".into())),
    ]
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_unit_checks_pass() {
        for (name, ok) in unit_checks() {
            assert!(ok, "{}", name);
        }
    }

    #[test]
    fn test_selftest_passes() {
        let mut out: Vec<u8> = Vec::new();
        let ok = run_selftest(&Engine::new(), false, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(ok, "{}", out);
        assert_eq!(out, format!("selftest: OK ({} passed)\n", unit_checks().len() + SPEC_CHECKS.len()));
    }
}
