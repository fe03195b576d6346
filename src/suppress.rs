//! Support for `// noqa` comment directives to suppress linter violations
//!
//! Supported formats:
//! - `// noqa` - suppress all violations on this line
//! - `// noqa: ASL001` - suppress a specific rule on this line
//! - `// noqa: ASL001,ASL002` - suppress multiple specific rules

use std::collections::HashSet;

/// Parsed noqa directive
#[derive(Debug, Clone)]
pub struct NoqaDirective {
    /// Line number (1-based)
    pub line: usize,
    /// Rule IDs to suppress (empty means suppress all)
    pub rule_ids: HashSet<String>,
}

/// Parse noqa directives from source code
pub fn parse_noqa_directives(source: &str) -> Vec<NoqaDirective> {
    let mut directives = Vec::new();

    for (line_idx, line) in source.lines().enumerate() {
        if let Some(mut directive) = parse_line_for_noqa(line) {
            directive.line = line_idx + 1;
            directives.push(directive);
        }
    }

    directives
}

/// Parse a single line for a noqa directive inside a `//` comment
fn parse_line_for_noqa(line: &str) -> Option<NoqaDirective> {
    let comment_start = line.find("//")?;
    let comment = &line[comment_start..];

    // Byte-wise ASCII search keeps offsets stable whatever else the
    // comment contains.
    let noqa_start = comment
        .as_bytes()
        .windows(4)
        .position(|w| w.eq_ignore_ascii_case(b"noqa"))?;
    let noqa_part = &comment[noqa_start..];

    if noqa_part.len() == 4 || !noqa_part[4..].trim_start().starts_with(':') {
        // Generic noqa - suppress all
        return Some(NoqaDirective {
            line: 0,
            rule_ids: HashSet::new(),
        });
    }

    let colon_idx = noqa_part.find(':')?;
    let rules_part = &noqa_part[colon_idx + 1..];

    let rule_ids: HashSet<String> = rules_part
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().next().unwrap_or(s).to_string())
        .collect();

    Some(NoqaDirective { line: 0, rule_ids })
}

/// Check if a violation at a specific line is suppressed by noqa directives
pub fn is_violation_suppressed(line: usize, rule_id: &str, directives: &[NoqaDirective]) -> bool {
    directives.iter().any(|directive| {
        directive.line == line
            && (directive.rule_ids.is_empty() || directive.rule_ids.contains(rule_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generic_noqa() {
        let source = "\nvoid Foo() { }  // noqa\n";
        let directives = parse_noqa_directives(source);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].line, 2);
        assert!(directives[0].rule_ids.is_empty());
    }

    #[test]
    fn test_parse_specific_rule() {
        let source = "\nTask FooAsync() { }  // noqa: ASL001\n";
        let directives = parse_noqa_directives(source);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].line, 2);
        assert!(directives[0].rule_ids.contains("ASL001"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let source = "Task FooAsync() { }  // noqa: ASL001, ASL002\n";
        let directives = parse_noqa_directives(source);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].rule_ids.len(), 2);
        assert!(directives[0].rule_ids.contains("ASL001"));
        assert!(directives[0].rule_ids.contains("ASL002"));
    }

    #[test]
    fn test_case_insensitive_marker() {
        let source = "void A() { }  // NOQA: ASL001\nvoid B() { }  // NoQa\n";
        let directives = parse_noqa_directives(source);
        assert_eq!(directives.len(), 2);
    }

    #[test]
    fn test_hash_comment_not_recognized() {
        let source = "void A() { }  # noqa\n";
        assert!(parse_noqa_directives(source).is_empty());
    }

    #[test]
    fn test_is_violation_suppressed() {
        let directives = vec![
            NoqaDirective {
                line: 5,
                rule_ids: HashSet::new(),
            },
            NoqaDirective {
                line: 10,
                rule_ids: ["ASL001".to_string()].into_iter().collect(),
            },
        ];

        assert!(is_violation_suppressed(5, "ASL001", &directives));
        assert!(is_violation_suppressed(5, "ASL999", &directives));
        assert!(is_violation_suppressed(10, "ASL001", &directives));
        assert!(!is_violation_suppressed(10, "ASL002", &directives));
        assert!(!is_violation_suppressed(1, "ASL001", &directives));
    }

    #[test]
    fn test_noqa_with_trailing_text() {
        let source = "Task FooAsync() { }  // noqa: ASL001 - intentional\n";
        let directives = parse_noqa_directives(source);
        assert_eq!(directives.len(), 1);
        assert!(directives[0].rule_ids.contains("ASL001"));
        assert!(!directives[0].rule_ids.contains("-"));
    }
}
