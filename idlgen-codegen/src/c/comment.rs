//! Block comment formatting.

/// Formats `text` as a C block comment indented by `level` spaces.
///
/// Each line of `text` becomes a ` * ` line; blank lines render as ` *`.
/// The result ends with a newline.
#[must_use]
pub fn format_comment(level: usize, text: &str) -> String {
    let mut output = String::new();
    for line in comment_lines(level, text) {
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Returns the lines of the block comment, without terminators.
#[must_use]
pub fn comment_lines(level: usize, text: &str) -> Vec<String> {
    let indent = " ".repeat(level);
    let mut lines = Vec::new();

    lines.push(format!("{}/*", indent));
    for line in text.split('\n') {
        if line.is_empty() {
            lines.push(format!("{} *", indent));
        } else {
            lines.push(format!("{} * {}", indent, line));
        }
    }
    lines.push(format!("{} */", indent));

    lines
}
