//! Textual rewrite of C-shell conditions into `[ ]` test syntax
//!
//! This is not an expression parser. Each `LHS op RHS` triple is rewritten
//! in place; parentheses and `&&` / `||` are copied through untouched, so
//! compound conditions come out as a sequence of rewritten comparisons that
//! a single `[ ]` cannot evaluate.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// File-test operator followed by its operand, e.g. `-e $file`
static FILE_TEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|\s)(-[A-Za-z])\s+("[^"]*"|'[^']*'|[^\s()]+)"#).expect("valid regex")
});

/// `LHS op RHS` with one of the supported relational operators
static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    let operand = r#""[^"]*"|'[^']*'|[^\s<>=!()"']+"#;
    Regex::new(&format!(
        r"({operand})\s*(==|!=|<=|>=|<|>)\s*({operand})"
    ))
    .expect("valid regex")
});

/// Rewrite a condition expression into a `[ ]`-compatible expression
///
/// `$a == b` becomes `"$a" = "b"`, `$i < 10` becomes `"$i" -lt "10"`,
/// `-e $f` becomes `-e "$f"`.
pub fn bashify(condition: &str) -> String {
    let quoted_tests = FILE_TEST.replace_all(condition.trim(), |caps: &Captures| {
        format!("{}{} {}", &caps[1], &caps[2], quote(&caps[3]))
    });

    COMPARISON
        .replace_all(&quoted_tests, |caps: &Captures| {
            compare(&caps[1], &caps[2], &caps[3])
        })
        .into_owned()
}

/// Render one comparison in test syntax
///
/// The left side is treated as a variable reference (`x` and `$x` both
/// become `"$x"`) unless it is a numeric or quoted literal.
pub fn compare(lhs: &str, op: &str, rhs: &str) -> String {
    format!("{} {} {}", variable_ref(lhs), test_operator(op), quote(rhs))
}

/// Map a C-shell relational operator to its `test` spelling
pub fn test_operator(op: &str) -> &str {
    match op {
        "==" => "=",
        "<" => "-lt",
        ">" => "-gt",
        "<=" => "-le",
        ">=" => "-ge",
        other => other,
    }
}

/// Render a variable reference as a quoted `"$name"` word
pub fn variable_ref(token: &str) -> String {
    if is_single_quoted(token) {
        return format!("\"{}\"", &token[1..token.len() - 1]);
    }
    let inner = strip_double_quotes(token);
    if inner.starts_with('$') || is_numeric(inner) {
        format!("\"{}\"", inner)
    } else {
        format!("\"${}\"", inner)
    }
}

/// Double-quote a word unless it is already quoted
pub fn quote(token: &str) -> String {
    if is_double_quoted(token) || is_single_quoted(token) {
        token.to_string()
    } else {
        format!("\"{}\"", token)
    }
}

fn strip_double_quotes(token: &str) -> &str {
    if is_double_quoted(token) {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

fn is_double_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

fn is_single_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'')
}

fn is_numeric(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
