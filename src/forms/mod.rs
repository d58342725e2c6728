pub mod catalog;
pub mod recipes;

/// Collapse runs of whitespace into single spaces and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize every line, trim blank lines at both ends and keep at most one
/// blank line between paragraphs.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && result.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
