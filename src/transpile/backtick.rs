//! Backtick command substitution migration
//!
//! Rewrites `` `cmd` `` to `$(cmd)`. Empty pairs and an unclosed trailing
//! backtick are left as literal text.

/// Replace every non-empty backtick substitution with `$(...)`
pub fn migrate_backticks(line: &str) -> String {
    if !line.contains('`') {
        return line.to_string();
    }

    let mut new_line = String::with_capacity(line.len() + 4);
    let mut in_backticks = false;
    let mut backtick_content = String::new();

    for ch in line.chars() {
        if ch == '`' {
            if !in_backticks {
                in_backticks = true;
            } else if backtick_content.is_empty() {
                // `` is not a substitution: emit the first tick, the second opens
                new_line.push('`');
            } else {
                new_line.push_str("$(");
                new_line.push_str(&backtick_content);
                new_line.push(')');
                backtick_content.clear();
                in_backticks = false;
            }
        } else if in_backticks {
            backtick_content.push(ch);
        } else {
            new_line.push(ch);
        }
    }

    if in_backticks {
        new_line.push('`');
        new_line.push_str(&backtick_content);
    }

    new_line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        assert_eq!(migrate_backticks("set d = `date`"), "set d = $(date)");
    }

    #[test]
    fn test_multiple_substitutions() {
        assert_eq!(
            migrate_backticks("echo `whoami`@`hostname`"),
            "echo $(whoami)@$(hostname)"
        );
    }

    #[test]
    fn test_no_backticks() {
        assert_eq!(migrate_backticks("echo hello"), "echo hello");
    }

    #[test]
    fn test_unclosed_backtick_is_literal() {
        assert_eq!(migrate_backticks("echo `date"), "echo `date");
    }

    #[test]
    fn test_empty_pair_is_literal() {
        assert_eq!(migrate_backticks("echo ``"), "echo ``");
        assert_eq!(migrate_backticks("a``b`c`"), "a`$(b)c`");
    }

    #[test]
    fn test_substitution_with_arguments() {
        assert_eq!(
            migrate_backticks("foreach f (`ls -1 *.c`)"),
            "foreach f ($(ls -1 *.c))"
        );
    }
}
