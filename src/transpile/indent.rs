//! Leading-whitespace handling
//!
//! Rules match against dedented text; the indentation split off here is
//! reapplied verbatim to every output line derived from the input line.

/// Split a line into its leading whitespace run and the remaining text
pub fn split_indent(line: &str) -> (&str, &str) {
    let end = line
        .char_indices()
        .find(|&(_, c)| !is_indent_char(c))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    line.split_at(end)
}

/// Prefix every line of `text` with `indent`
///
/// Embedded line breaks produce one output line each, all carrying the
/// indentation. Trailing empty segments are dropped.
pub fn reindent(indent: &str, text: &str) -> Vec<String> {
    let mut parts: Vec<&str> = text.split('\n').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
        .into_iter()
        .map(|part| format!("{}{}", indent, part))
        .collect()
}

fn is_indent_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0B' | '\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_indent() {
        assert_eq!(split_indent("  \tendif"), ("  \t", "endif"));
    }

    #[test]
    fn test_split_no_indent() {
        assert_eq!(split_indent("endif"), ("", "endif"));
    }

    #[test]
    fn test_split_keeps_trailing_whitespace() {
        assert_eq!(split_indent("    echo hi  "), ("    ", "echo hi  "));
    }

    #[test]
    fn test_reindent_multiline() {
        let lines = reindent("  ", "}\n\nnext() {");
        assert_eq!(lines, vec!["  }", "  ", "  next() {"]);
    }

    #[test]
    fn test_reindent_drops_trailing_empty() {
        assert_eq!(reindent("\t", "done\n"), vec!["\tdone"]);
    }

    #[test]
    fn test_reindent_empty_text() {
        assert!(reindent("  ", "").is_empty());
    }
}
