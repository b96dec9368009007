//! Ordered line rewrite rules
//!
//! Each rule is a named predicate+transform over a dedented line. Rules are
//! tried in declaration order and the first match wins; a line no rule
//! claims passes through unchanged. Order is significant: `default:` must be
//! seen before the label rule, `else if` before bare `else`, and so on.

use super::condition::{bashify, compare, variable_ref};
use super::ConversionState;
use regex::Regex;
use std::sync::LazyLock;

/// Signature shared by every rule: `Some(text)` claims the line
type RewriteFn = fn(&str, &mut ConversionState) -> Option<String>;

/// A single named rewrite rule
pub struct Rule {
    pub name: &'static str,
    apply: RewriteFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Name reported when no rule matched
pub const PASSTHROUGH: &str = "passthrough";

static RULES: &[Rule] = &[
    Rule { name: "shebang", apply: shebang },
    Rule { name: "block_comment", apply: block_comment },
    Rule { name: "setenv", apply: setenv },
    Rule { name: "set", apply: set },
    Rule { name: "cd", apply: cd },
    Rule { name: "if_not", apply: if_not },
    Rule { name: "if_compare", apply: if_compare },
    Rule { name: "else_if", apply: else_if },
    Rule { name: "else", apply: else_ },
    Rule { name: "endif", apply: endif },
    Rule { name: "while", apply: while_ },
    Rule { name: "foreach", apply: foreach },
    Rule { name: "switch", apply: switch },
    Rule { name: "case", apply: case },
    Rule { name: "breaksw", apply: breaksw },
    Rule { name: "default", apply: default },
    Rule { name: "endsw", apply: endsw },
    Rule { name: "end", apply: end },
    Rule { name: "alias", apply: alias },
    Rule { name: "unalias", apply: unalias },
    Rule { name: "goto", apply: goto },
    Rule { name: "label", apply: label },
    Rule { name: "source", apply: source },
];

static SETENV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^setenv\s+(\S+)\s+(\S+)").expect("valid regex"));
static SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set\s+(\S+)\s*=\s*(.+)").expect("valid regex"));
static CD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^cd\s+([^"'\s].*)$"#).expect("valid regex"));
static IF_NOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^if\s*!\s*\(\s*(.+?)\s*\)\s*then").expect("valid regex")
});
static IF_COMPARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^if\s*\(\s*\$?(\S+)\s*(==|!=)\s*(\S+)\s*\)\s*then").expect("valid regex")
});
static ELSE_IF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^else\s+if\s*\(\s*\$?(\S+)\s*(==|!=)\s*(\S+)\s*\)\s*then").expect("valid regex")
});
static ELSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^else\s*$").expect("valid regex"));
static WHILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^while\s*\((.+)\)$").expect("valid regex"));
static FOREACH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^foreach\s+(\S+)\s*\((.+)\)").expect("valid regex"));
static SWITCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^switch\s*\(\s*(\S+)\s*\)").expect("valid regex"));
static CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^case\s+(.+):$").expect("valid regex"));
static ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^alias\s+(\S+)\s+(.*)").expect("valid regex"));
static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):$").expect("valid regex"));

/// Applies the rule table to dedented lines
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    rules: &'static [Rule],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Rewrite one dedented line
    ///
    /// The result may span several lines (separated by `\n`) or be empty,
    /// in which case the line produces no output.
    pub fn apply(&self, line: &str, state: &mut ConversionState) -> String {
        self.apply_named(line, state).1
    }

    /// Rewrite one dedented line, also reporting which rule claimed it
    pub fn apply_named(&self, line: &str, state: &mut ConversionState) -> (&'static str, String) {
        for rule in self.rules {
            if let Some(rewritten) = (rule.apply)(line, state) {
                return (rule.name, rewritten);
            }
        }
        (PASSTHROUGH, line.to_string())
    }
}

fn shebang(line: &str, _: &mut ConversionState) -> Option<String> {
    line.starts_with("#!").then(String::new)
}

fn block_comment(line: &str, _: &mut ConversionState) -> Option<String> {
    (line.starts_with(": <<'END'") || line.trim_end() == "END").then(|| line.to_string())
}

fn setenv(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = SETENV.captures(line)?;
    Some(format!("export {}={}", &caps[1], &caps[2]))
}

fn set(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = SET.captures(line.trim_end())?;
    Some(format!("{}={}", &caps[1], &caps[2]))
}

fn cd(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = CD.captures(line.trim_end())?;
    Some(format!("cd \"{}\"", &caps[1]))
}

fn if_not(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = IF_NOT.captures(line)?;
    Some(format!("if [ ! {} ]; then", bashify(&caps[1])))
}

fn if_compare(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = IF_COMPARE.captures(line)?;
    Some(format!("if [ {} ]; then", compare(&caps[1], &caps[2], &caps[3])))
}

fn else_if(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = ELSE_IF.captures(line)?;
    Some(format!("elif [ {} ]; then", compare(&caps[1], &caps[2], &caps[3])))
}

fn else_(line: &str, _: &mut ConversionState) -> Option<String> {
    ELSE.is_match(line).then(|| "else".to_string())
}

fn endif(line: &str, _: &mut ConversionState) -> Option<String> {
    keyword(line, "endif", "fi")
}

fn while_(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = WHILE.captures(line.trim_end())?;
    Some(format!("while [ {} ]; do", bashify(&caps[1])))
}

fn foreach(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = FOREACH.captures(line)?;
    Some(format!("for {} in {}; do", &caps[1], caps[2].trim()))
}

fn switch(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = SWITCH.captures(line)?;
    Some(format!("case {} in", variable_ref(&caps[1])))
}

fn case(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = CASE.captures(line.trim_end())?;
    Some(format!("{})", case_pattern(caps[1].trim())))
}

fn breaksw(line: &str, _: &mut ConversionState) -> Option<String> {
    keyword(line, "breaksw", ";;")
}

fn default(line: &str, _: &mut ConversionState) -> Option<String> {
    line.starts_with("default:").then(|| "*)".to_string())
}

fn endsw(line: &str, _: &mut ConversionState) -> Option<String> {
    keyword(line, "endsw", "esac")
}

fn end(line: &str, _: &mut ConversionState) -> Option<String> {
    keyword(line, "end", "done")
}

fn alias(line: &str, _: &mut ConversionState) -> Option<String> {
    let caps = ALIAS.captures(line.trim_end())?;
    let value = caps[2].trim();
    let quoted = value.starts_with('\'') || value.starts_with('"');
    if !quoted && value.contains(char::is_whitespace) {
        Some(format!("alias {}='{}'", &caps[1], value))
    } else {
        Some(format!("alias {}={}", &caps[1], value))
    }
}

fn unalias(line: &str, _: &mut ConversionState) -> Option<String> {
    line.starts_with("unalias ").then(|| line.to_string())
}

fn goto(line: &str, _: &mut ConversionState) -> Option<String> {
    let target = line.strip_prefix("goto ")?.trim();
    if target.is_empty() {
        return None;
    }
    if target.starts_with('$') {
        Some(format!("eval \"{}\"\nreturn", target))
    } else {
        Some(format!("{}\nreturn", target))
    }
}

fn label(line: &str, state: &mut ConversionState) -> Option<String> {
    let caps = LABEL.captures(line.trim_end())?;
    Some(state.blocks.open_label(&caps[1]))
}

fn source(line: &str, _: &mut ConversionState) -> Option<String> {
    let path = line.strip_prefix("source ")?;
    Some(format!(". {}", path))
}

fn keyword(line: &str, word: &str, replacement: &str) -> Option<String> {
    (line.trim_end() == word).then(|| replacement.to_string())
}

/// Strip surrounding quotes from a case value
///
/// Exception: a quoted value containing whitespace keeps its quotes, since
/// bash would otherwise read `two words)` as a syntax error.
fn case_pattern(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if !quoted {
        return value;
    }
    let inner = &value[1..value.len() - 1];
    if inner.contains(char::is_whitespace) {
        value
    } else {
        inner
    }
}
