//! Manual-review notes for converted scripts
//!
//! The rule table rewrites what it can and passes the rest through. This
//! module scans the source script for constructs that come out untranslated
//! or only approximately translated, so the user knows where to look.

use crate::transpile::indent::split_indent;
use crate::transpile::rules::{RuleEngine, PASSTHROUGH};
use crate::transpile::ConversionState;
use nu_ansi_term::Color;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// How much attention a note needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Translated, but the result should be checked
    Moderate,
    /// Not translated, or translated in a way that changes behavior
    Complex,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Moderate => write!(f, "moderate"),
            Severity::Complex => write!(f, "complex"),
        }
    }
}

/// One flagged line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewNote {
    /// Line number in the source script (1-based)
    pub line_number: usize,
    /// Construct identifier
    pub construct: &'static str,
    pub severity: Severity,
    /// What to check
    pub explanation: &'static str,
    /// The dedented source line
    pub snippet: String,
}

/// A line check: construct id, severity, explanation, predicate
struct Check {
    construct: &'static str,
    severity: Severity,
    explanation: &'static str,
    matches: fn(&str) -> bool,
}

static COMPOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(if|else\s+if|while)\b.*(&&|\|\|)").expect("valid regex")
});
static IF_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(else\s+)?if\s*!?\s*\(").expect("valid regex"));
static SETENV_MULTIWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^setenv\s+\S+\s+\S+\s+\S").expect("valid regex"));
static WORD_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set\s+\S+\s*=\s*\(").expect("valid regex"));
static EXISTENCE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[?#]\{?[A-Za-z_]").expect("valid regex"));
static COMBINED_REDIRECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">>?&!?\s*[^\s\d&-]|\|&").expect("valid regex"));
static ARITHMETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\s|$)").expect("valid regex"));
static REPEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^repeat\s+\d+\s").expect("valid regex"));
static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):$").expect("valid regex"));
static GOTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^goto\s+(\S+)").expect("valid regex"));

static CHECKS: &[Check] = &[
    Check {
        construct: "compound_condition",
        severity: Severity::Complex,
        explanation: "&& / || inside a condition is rewritten comparison by comparison; \
            a single [ ] cannot evaluate it, split it into separate tests",
        matches: |line| COMPOUND.is_match(line),
    },
    Check {
        construct: "single_line_if",
        severity: Severity::Moderate,
        explanation: "single-line if without then is left in C-shell syntax",
        matches: |line| {
            IF_HEAD.is_match(line) && {
                let t = line.trim_end();
                !t.ends_with("then") && !t.ends_with('\\')
            }
        },
    },
    Check {
        construct: "untranslated_condition",
        severity: Severity::Moderate,
        explanation: "only == and != comparisons are rewritten in if / else if; \
            this condition is left in C-shell syntax",
        matches: |line| {
            IF_HEAD.is_match(line)
                && line.trim_end().ends_with("then")
                && claimed_by_passthrough(line)
        },
    },
    Check {
        construct: "untranslated_while",
        severity: Severity::Moderate,
        explanation: "while condition not recognised; left in C-shell syntax",
        matches: |line| line.starts_with("while") && claimed_by_passthrough(line),
    },
    Check {
        construct: "dynamic_goto",
        severity: Severity::Moderate,
        explanation: "goto through a variable becomes eval of the variable's value; \
            it must hold the name of a label",
        matches: |line| line.starts_with("goto $"),
    },
    Check {
        construct: "arithmetic",
        severity: Severity::Complex,
        explanation: "@ arithmetic is not translated; use (( )) or $(( ))",
        matches: |line| ARITHMETIC.is_match(line),
    },
    Check {
        construct: "onintr",
        severity: Severity::Complex,
        explanation: "onintr is not translated; use trap",
        matches: |line| line == "onintr" || line.starts_with("onintr "),
    },
    Check {
        construct: "repeat",
        severity: Severity::Complex,
        explanation: "repeat is not translated; use a for loop",
        matches: |line| REPEAT.is_match(line),
    },
    Check {
        construct: "word_list",
        severity: Severity::Moderate,
        explanation: "word list becomes a bash array; bash indexes arrays from 0, \
            C-shell from 1",
        matches: |line| WORD_LIST.is_match(line),
    },
    Check {
        construct: "existence_ref",
        severity: Severity::Moderate,
        explanation: "$?name / $#name have no direct bash equivalent; \
            use ${name+1} / ${#name[@]}",
        matches: |line| EXISTENCE_REF.is_match(line),
    },
    Check {
        construct: "combined_redirect",
        severity: Severity::Moderate,
        explanation: ">& and |& redirect stderr too; write > file 2>&1 or 2>&1 |",
        matches: |line| COMBINED_REDIRECT.is_match(line),
    },
    Check {
        construct: "history_alias",
        severity: Severity::Moderate,
        explanation: "bash aliases cannot use \\! argument references; use a function",
        matches: |line| line.starts_with("alias") && line.contains("\\!"),
    },
    Check {
        construct: "setenv_multiword",
        severity: Severity::Moderate,
        explanation: "setenv keeps only the first word of the value",
        matches: |line| SETENV_MULTIWORD.is_match(line.trim_end()),
    },
];

fn claimed_by_passthrough(line: &str) -> bool {
    let mut scratch = ConversionState::new();
    RuleEngine::new().apply_named(line, &mut scratch).0 == PASSTHROUGH
}

/// Scan `source` and return notes sorted by line number
pub fn review(source: &str) -> Vec<ReviewNote> {
    let mut notes = Vec::new();
    let mut labels = HashSet::new();
    let mut gotos = Vec::new();
    let mut in_block_comment = false;

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        let (indent, line) = split_indent(raw.trim_end_matches('\r'));

        if in_block_comment {
            if line.trim_end() == "END" {
                in_block_comment = false;
            }
            continue;
        }
        if line.starts_with(": <<'END'") {
            in_block_comment = true;
            continue;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for check in CHECKS {
            if (check.matches)(line) {
                notes.push(note(line_number, check.construct, check.severity, check.explanation, line));
            }
        }

        if let Some(caps) = LABEL.captures(line.trim_end()) {
            if &caps[1] == "default" {
                continue;
            }
            labels.insert(caps[1].to_string());
            if !indent.is_empty() {
                notes.push(note(
                    line_number,
                    "nested_label",
                    Severity::Complex,
                    "label inside a nested block becomes a function; jumping into \
                        the middle of another block is not supported",
                    line,
                ));
            }
        } else if let Some(caps) = GOTO.captures(line) {
            if !caps[1].starts_with('$') {
                gotos.push((line_number, caps[1].to_string(), line.to_string()));
            }
        }
    }

    for (line_number, target, snippet) in gotos {
        if !labels.contains(&target) {
            notes.push(ReviewNote {
                line_number,
                construct: "undefined_label",
                severity: Severity::Complex,
                explanation: "goto target is not defined in this script; the call will fail",
                snippet,
            });
        }
    }

    notes.sort_by_key(|n| n.line_number);
    notes
}

fn note(
    line_number: usize,
    construct: &'static str,
    severity: Severity,
    explanation: &'static str,
    line: &str,
) -> ReviewNote {
    ReviewNote {
        line_number,
        construct,
        severity,
        explanation,
        snippet: line.trim_end().to_string(),
    }
}

/// Format review notes for display, grouped by severity
pub fn format_notes(notes: &[ReviewNote], color: bool) -> String {
    if notes.is_empty() {
        return "No manual review needed.\n".to_string();
    }

    let mut output = String::new();
    let groups = [
        (Severity::Complex, "MANUAL INTERVENTION", Color::Magenta),
        (Severity::Moderate, "REVIEW RECOMMENDED", Color::Yellow),
    ];

    for (severity, heading, heading_color) in groups {
        let group: Vec<&ReviewNote> = notes.iter().filter(|n| n.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        let heading = if color {
            heading_color.bold().paint(heading).to_string()
        } else {
            heading.to_string()
        };
        output.push_str(&format!("{} ({} notes):\n", heading, group.len()));
        for n in group {
            output.push_str(&format!("  • Line {}: {}\n", n.line_number, n.snippet));
            output.push_str(&format!("    {}\n", n.explanation));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constructs(source: &str) -> Vec<&'static str> {
        review(source).into_iter().map(|n| n.construct).collect()
    }

    #[test]
    fn test_clean_script_has_no_notes() {
        let src = "setenv A 1\nif ($A == 1) then\n  echo yes\nendif\n";
        assert!(review(src).is_empty());
    }

    #[test]
    fn test_compound_condition() {
        let notes = review("if ($a == 1 && $b == 2) then\nendif\n");
        assert_eq!(notes[0].construct, "compound_condition");
        assert_eq!(notes[0].severity, Severity::Complex);
        assert_eq!(notes[0].line_number, 1);
    }

    #[test]
    fn test_single_line_if() {
        assert_eq!(constructs("if ($x == 1) echo one\n"), vec!["single_line_if"]);
    }

    #[test]
    fn test_relational_if_untranslated() {
        assert_eq!(constructs("if ($n > 3) then\nendif\n"), vec!["untranslated_condition"]);
    }

    #[test]
    fn test_translated_while_not_flagged() {
        assert!(review("while ($i < 10)\nend\n").is_empty());
    }

    #[test]
    fn test_dynamic_goto() {
        let c = constructs("goto $next\n");
        assert_eq!(c, vec!["dynamic_goto"]);
    }

    #[test]
    fn test_undefined_label() {
        let notes = review("goto missing\nfound:\n  echo\n");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].construct, "undefined_label");
        assert!(review("goto found\nfound:\n").is_empty());
    }

    #[test]
    fn test_nested_label() {
        let c = constructs("if ($a == 1) then\n  inner:\n  echo\nendif\n");
        assert_eq!(c, vec!["nested_label"]);
    }

    #[test]
    fn test_unsupported_builtins() {
        let c = constructs("@ i = $i + 1\nonintr cleanup\nrepeat 3 echo hi\n");
        assert_eq!(c, vec!["arithmetic", "onintr", "repeat"]);
    }

    #[test]
    fn test_word_list_and_refs() {
        let c = constructs("set files = ( a b )\necho $#files\n");
        assert_eq!(c, vec!["word_list", "existence_ref"]);
    }

    #[test]
    fn test_combined_redirect() {
        assert_eq!(constructs("make >& build.log\n"), vec!["combined_redirect"]);
        assert!(constructs("make > build.log 2>&1\n").is_empty());
    }

    #[test]
    fn test_history_alias() {
        assert_eq!(constructs("alias cd 'cd \\!*; ls'\n"), vec!["history_alias"]);
    }

    #[test]
    fn test_setenv_multiword() {
        assert_eq!(constructs("setenv MSG hello world\n"), vec!["setenv_multiword"]);
        assert!(constructs("setenv MSG hello\n").is_empty());
    }

    #[test]
    fn test_block_comment_skipped() {
        let src = ": <<'END'\n@ i = 1\ngoto nowhere\nEND\n";
        assert!(review(src).is_empty());
    }

    #[test]
    fn test_comments_skipped() {
        assert!(review("# @ x = 1\n").is_empty());
    }

    #[test]
    fn test_format_notes_empty() {
        assert!(format_notes(&[], false).contains("No manual review needed"));
    }

    #[test]
    fn test_format_notes_groups() {
        let notes = review("@ i = 1\ngoto $x\n");
        let text = format_notes(&notes, false);
        assert!(text.contains("MANUAL INTERVENTION (1 notes)"));
        assert!(text.contains("REVIEW RECOMMENDED (1 notes)"));
        assert!(text.contains("Line 2: goto $x"));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Moderate.to_string(), "moderate");
        assert_eq!(Severity::Complex.to_string(), "complex");
    }
}
