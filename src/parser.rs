//! Spec line classifier
//!
//! Maps one line of a shell-test spec to a [`LineEvent`] by its first
//! character:
//! - `!` starts a testcase; the rest is the shell command
//! - `<` appends a stdin line
//! - `>` appends an expected stdout line
//! - `/` appends an expected stderr line
//! - `?` sets the expected exit status
//! - blank lines and `#` comments are ignored
//!
//! Anything else is malformed. The caller strips leading whitespace.

/// A classified spec line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// `!cmd` — remainder after the marker, not yet trimmed
    Command(String),
    /// `<text`
    StdinLine(String),
    /// `>text`
    StdoutLine(String),
    /// `/text`
    StderrLine(String),
    /// `?N`
    ExitStatus(i32),
    /// `?` followed by something that is not an integer
    BadExitStatus(String),
    /// Blank line or `#` comment
    Ignore,
    /// Unknown marker; holds the raw line
    Malformed(String),
}

impl LineEvent {
    /// The marker character a directive line started with, for diagnostics.
    pub fn marker(&self) -> Option<char> {
        match self {
            LineEvent::Command(_) => Some('!'),
            LineEvent::StdinLine(_) => Some('<'),
            LineEvent::StdoutLine(_) => Some('>'),
            LineEvent::StderrLine(_) => Some('/'),
            LineEvent::ExitStatus(_) | LineEvent::BadExitStatus(_) => Some('?'),
            LineEvent::Ignore => None,
            LineEvent::Malformed(raw) => raw.chars().next(),
        }
    }
}

/// Strip a single trailing `\n` or `\r\n`.
fn strip_terminator(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

/// Classify one spec line (leading whitespace already removed).
pub fn classify_line(line: &str) -> LineEvent {
    let mut chars = line.chars();
    let marker = match chars.next() {
        None => return LineEvent::Ignore,
        Some(c) => c,
    };
    let rest = strip_terminator(chars.as_str());

    match marker {
        '!' => LineEvent::Command(rest.to_string()),
        '<' => LineEvent::StdinLine(rest.to_string()),
        '>' => LineEvent::StdoutLine(rest.to_string()),
        '/' => LineEvent::StderrLine(rest.to_string()),
        '?' => match rest.trim().parse::<i32>() {
            Ok(n) => LineEvent::ExitStatus(n),
            Err(_) => LineEvent::BadExitStatus(rest.to_string()),
        },
        '#' | '\n' | '\r' => LineEvent::Ignore,
        _ => LineEvent::Malformed(strip_terminator(line).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_command() {
        assert_eq!(classify_line("!echo hi"), LineEvent::Command("echo hi".into()));
        // trimming is the builder's job
        assert_eq!(classify_line("! ls -l \n"), LineEvent::Command(" ls -l ".into()));
    }

    #[test]
    fn test_classify_content_lines() {
        assert_eq!(classify_line("<input\n"), LineEvent::StdinLine("input".into()));
        assert_eq!(classify_line(">  keep spaces"), LineEvent::StdoutLine("  keep spaces".into()));
        assert_eq!(classify_line("/oops\r\n"), LineEvent::StderrLine("oops".into()));
        assert_eq!(classify_line(">"), LineEvent::StdoutLine(String::new()));
    }

    #[test]
    fn test_classify_exit_status() {
        assert_eq!(classify_line("?0"), LineEvent::ExitStatus(0));
        assert_eq!(classify_line("? 3 \n"), LineEvent::ExitStatus(3));
        assert_eq!(classify_line("?-1"), LineEvent::ExitStatus(-1));
    }

    #[test]
    fn test_classify_bad_exit_status() {
        assert_eq!(classify_line("?abc"), LineEvent::BadExitStatus("abc".into()));
        assert_eq!(classify_line("?"), LineEvent::BadExitStatus(String::new()));
        assert_eq!(classify_line("?abc").marker(), Some('?'));
    }

    #[test]
    fn test_classify_ignored() {
        assert_eq!(classify_line(""), LineEvent::Ignore);
        assert_eq!(classify_line("\n"), LineEvent::Ignore);
        assert_eq!(classify_line("# comment"), LineEvent::Ignore);
        assert_eq!(classify_line("#"), LineEvent::Ignore);
    }

    #[test]
    fn test_classify_malformed() {
        let ev = classify_line("@x");
        assert_eq!(ev, LineEvent::Malformed("@x".into()));
        assert_eq!(ev.marker(), Some('@'));
        assert_eq!(classify_line("echo hi\n"), LineEvent::Malformed("echo hi".into()));
    }
}
