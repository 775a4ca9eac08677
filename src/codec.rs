//! Line codec
//!
//! Converts between a block of text and the logical lines it holds.
//! Every line produced by [`lines_to_block`] carries exactly one `\n`,
//! so [`block_to_lines`] drops the single empty fragment a plain split
//! leaves after the final terminator. The two are mutual inverses.

/// Join lines into a block, terminating every line (including the last).
pub fn lines_to_block<S: AsRef<str>>(lines: &[S]) -> String {
    let mut block = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for line in lines {
        block.push_str(line.as_ref());
        block.push('\n');
    }
    block
}

/// Split a block into lines.
///
/// `""` gives no lines, `"\n"` gives one empty line. An unterminated
/// final line is kept as is.
pub fn block_to_lines(block: &str) -> Vec<String> {
    let mut lines: Vec<String> = block.split('\n').map(str::to_string).collect();
    if lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    lines
}
