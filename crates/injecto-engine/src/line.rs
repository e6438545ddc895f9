//! Line splitting and classification helpers.

/// Split text into lines, keeping each line's terminator.
///
/// Joining the result reproduces the input exactly.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Split a line into its content and terminator (`"\n"`, `"\r\n"` or `""`).
pub(crate) fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Whitespace-only (or empty) line.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Line whose first non-whitespace character is `#`.
pub(crate) fn is_commented(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Prefix `# ` after the line's leading whitespace.
pub(crate) fn comment_out(line: &str) -> String {
    let content = line.trim_start();
    let indent = &line[..line.len() - content.len()];
    format!("{indent}# {content}")
}

/// Remove the first `#` and at most one following space or tab.
///
/// Returns `None` when the line has no `#`, or when the uncommented text would
/// be a directive (`@param`, `@section`), which must stay commented.
pub(crate) fn uncomment(line: &str) -> Option<String> {
    let hash = line.find('#')?;
    let after = &line[hash + 1..];
    let after = after
        .strip_prefix(' ')
        .or_else(|| after.strip_prefix('\t'))
        .unwrap_or(after);

    let uncommented = format!("{}{after}", &line[..hash]);
    let content = uncommented.trim_start();
    if content.starts_with("@param") || content.starts_with("@section") {
        return None;
    }
    Some(uncommented)
}
