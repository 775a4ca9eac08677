//! Channel comparison and the positional diff report
//!
//! Diff rows:
//!
//! ```text
//! 3  same          both sides agree (context)
//! 4 =actual        mismatch, actual side
//! exp :expected    mismatch, expected side
//! 5 ~DEBUG: x      debug line, skipped while filtering
//! 6 +extra         actual line with nothing left to match
//! exp!:missing     expected line never produced
//! ```
//!
//! Positions are 1-based indices into the unfiltered actual lines.

use std::io;
use std::sync::OnceLock;
use regex::Regex;
use crate::stats::RunStats;

fn debug_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:#|DEBUG:)").expect("static regex"))
}

/// A debug line starts with `#` or `DEBUG:`.
pub fn is_debug_line(line: &str) -> bool {
    debug_line_re().is_match(line)
}

/// Compare one output channel. Prints the diff (or, when filtering hid
/// debug lines, the full actual output) through `stats` and marks the
/// testcase failed on mismatch.
pub fn check(
    stats: &mut RunStats<'_>,
    label: &str,
    command: &str,
    actual: &[String],
    expected: &[String],
    filter_debug: bool,
) -> io::Result<bool> {
    let has_debug = filter_debug && actual.iter().any(|l| is_debug_line(l));

    let passed = if has_debug {
        let kept: Vec<&String> = actual.iter().filter(|l| !is_debug_line(l)).collect();
        kept.len() == expected.len() && kept.iter().zip(expected).all(|(a, e)| *a == e)
    } else {
        actual == expected
    };

    if passed {
        if has_debug {
            stats.line(&format!("--- {} (OK) ---", label))?;
            for (i, line) in actual.iter().enumerate() {
                let mark = if is_debug_line(line) { '~' } else { '=' };
                stats.line(&format!("{} {}{}", i + 1, mark, line))?;
            }
        }
        return Ok(true);
    }

    stats.fail(&format!("{} differs for: {}", label, command))?;
    stats.line(&format!("--- {} ---", label))?;
    print_diff(stats, actual, expected, filter_debug)?;
    Ok(false)
}

/// Walk both sides in lockstep and print one row per step.
fn print_diff(
    stats: &mut RunStats<'_>,
    actual: &[String],
    expected: &[String],
    filter_debug: bool,
) -> io::Result<()> {
    let (mut a, mut e) = (0, 0);

    while a < actual.len() && e < expected.len() {
        let line = &actual[a];
        if filter_debug && is_debug_line(line) {
            stats.line(&format!("{} ~{}", a + 1, line))?;
            a += 1;
            continue;
        }
        if *line == expected[e] {
            stats.line(&format!("{}  {}", a + 1, line))?;
        } else {
            stats.line(&format!("{} ={}", a + 1, line))?;
            stats.line(&format!("exp :{}", expected[e]))?;
        }
        a += 1;
        e += 1;
    }

    for (i, line) in actual.iter().enumerate().skip(a) {
        let mark = if filter_debug && is_debug_line(line) { '~' } else { '+' };
        stats.line(&format!("{} {}{}", i + 1, mark, line))?;
    }
    for line in &expected[e..] {
        stats.line(&format!("exp!:{}", line))?;
    }
    Ok(())
}

/// Compare the exit status channel.
pub fn check_status(
    stats: &mut RunStats<'_>,
    command: &str,
    actual: i32,
    expected: i32,
) -> io::Result<bool> {
    if actual == expected {
        return Ok(true);
    }
    stats.fail(&format!("exit status {}, expected {} for: {}", actual, expected, command))?;
    Ok(false)
}
