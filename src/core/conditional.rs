/// Conditional sub-parser: `script-if` / `script-elif` / `script-else`
/// callout blocks.

use crate::core::inline::substitute_inline;
use crate::core::translation::{schema, CALLOUT_PREFIX, QUOTE_PREFIX};
use crate::core::BlockOutput;

/// Parse a conditional block starting at `start`.
///
/// Consumes the `if` opener, any `elif` lines, at most one `else` line
/// and the quoted lines between them (re-indented by two spaces). The
/// block ends at the first line of any other shape; a second `if` opener
/// starts a new block instead of nesting. The closing brace is emitted
/// only when an opener was consumed.
pub fn parse_conditional_block<L: AsRef<str>>(lines: &[L], start: usize) -> BlockOutput {
    let c = &schema().conditionals;
    let mut out = BlockOutput {
        next: start + 1,
        ..BlockOutput::default()
    };

    let Some(first) = lines.get(start).map(|l| l.as_ref().trim()) else {
        return out;
    };
    let Some(open) = c.open.apply(first) else {
        out.lines.push(substitute_inline(first));
        return out;
    };
    if open == "{:" {
        out.warnings
            .push(format!("line {}: conditional block has an empty condition", start + 1));
    }
    out.lines.push(open);

    let mut seen_else = false;
    let mut i = start + 1;
    while let Some(line) = lines.get(i) {
        let trimmed = line.as_ref().trim();
        if c.open.is_match(trimmed) {
            break;
        } else if let Some(elif) = c.elif.apply(trimmed) {
            if seen_else {
                out.warnings.push(format!(
                    "line {}: elif after else ends the conditional block",
                    i + 1
                ));
                break;
            }
            if elif == "- :" {
                out.warnings
                    .push(format!("line {}: conditional branch has an empty condition", i + 1));
            }
            out.lines.push(elif);
        } else if let Some(otherwise) = c.otherwise.apply(trimmed) {
            if seen_else {
                out.warnings.push(format!(
                    "line {}: second else ends the conditional block",
                    i + 1
                ));
                break;
            }
            seen_else = true;
            out.lines.push(otherwise);
        } else if trimmed.starts_with(CALLOUT_PREFIX) {
            break;
        } else if let Some(content) = trimmed.strip_prefix(QUOTE_PREFIX) {
            out.lines.push(format!("  {}", substitute_inline(content)));
        } else {
            break;
        }
        i += 1;
    }

    out.lines.push(c.close().to_string());
    out.next = i;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_elif_else_block() {
        let lines = [
            "> [!script-if] gold > 10",
            "> You are rich.",
            "> [!script-elif] gold > 0",
            "> You get by.",
            "> [!script-else]",
            "> You are broke.",
            "Afterwards.",
        ];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(
            out.lines,
            vec![
                "{gold > 10:",
                "  You are rich.",
                "- gold > 0:",
                "  You get by.",
                "- else:",
                "  You are broke.",
                "}",
            ]
        );
        assert_eq!(out.next, 6);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn body_lines_get_inline_substitution() {
        let lines = ["> [!script-if] met", "> Hello again. `script: ~ visits += 1`"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines, vec!["{met:", "  Hello again. ~ visits += 1", "}"]);
        assert_eq!(out.next, 2);
    }

    #[test]
    fn second_if_starts_new_block() {
        let lines = ["> [!script-if] a", "> one", "> [!script-if] b", "> two"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines, vec!["{a:", "  one", "}"]);
        assert_eq!(out.next, 2);
    }

    #[test]
    fn ends_at_other_callout() {
        let lines = ["> [!script-if] a", "> one", "> [!script-cycle]", "> x"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.next, 2);
        assert_eq!(out.lines.last().map(String::as_str), Some("}"));
    }

    #[test]
    fn elif_after_else_warns() {
        let lines = ["> [!script-if] a", "> [!script-else]", "> [!script-elif] b"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines, vec!["{a:", "- else:", "}"]);
        assert_eq!(out.next, 2);
        assert_eq!(out.warnings, vec!["line 3: elif after else ends the conditional block"]);
    }

    #[test]
    fn empty_condition_warns() {
        let lines = ["> [!script-if]", "> text"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines[0], "{:");
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn empty_elif_condition_warns() {
        let lines = ["> [!script-if] a", "> [!script-elif]", "> x"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines, vec!["{a:", "- :", "  x", "}"]);
        assert_eq!(out.warnings, vec!["line 2: conditional branch has an empty condition"]);
    }

    #[test]
    fn no_opener_means_no_close() {
        let lines = ["Just text `script: x`"];
        let out = parse_conditional_block(&lines, 0);
        assert_eq!(out.lines, vec!["Just text x"]);
        assert_eq!(out.next, 1);
    }
}
