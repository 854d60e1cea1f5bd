/// Body transpiler: the single forward pass over a note's body lines.

use serde::{Deserialize, Serialize};

use crate::core::choice::{is_choice_line, parse_choice_block};
use crate::core::conditional::parse_conditional_block;
use crate::core::inline::substitute_inline;
use crate::core::sequence::parse_sequence_block;
use crate::core::translation::schema;
use crate::core::BlockOutput;
use crate::schema::options::{ChoiceSyntax, TranspileOptions};

/// Script lines produced for one body, plus what went wrong along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyOutput {
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
}

/// What a trimmed body line is, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Stitch,
    Heading,
    /// END, DONE and every divert form.
    Navigation,
    NamedGather,
    Gather,
    TempVar,
    Mutation,
    ConditionalOpener,
    SequenceOpener,
    Choice,
    Text,
}

impl LineKind {
    /// Kinds that consume more than the current line.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::ConditionalOpener | Self::SequenceOpener | Self::Choice
        )
    }
}

/// Classify a trimmed line. The first matching rule wins; anything
/// unrecognized is [`LineKind::Text`].
pub fn classify(trimmed: &str, syntax: ChoiceSyntax) -> LineKind {
    let s = schema();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if s.structure.comment.is_match(trimmed) {
        LineKind::Comment
    } else if s.structure.stitch.is_match(trimmed) {
        LineKind::Stitch
    } else if s.structure.heading.is_match(trimmed) {
        LineKind::Heading
    } else if s.navigation.translate(trimmed).is_some() {
        LineKind::Navigation
    } else if s.gathers.named.is_match(trimmed) {
        LineKind::NamedGather
    } else if s.gathers.basic.is_match(trimmed) {
        LineKind::Gather
    } else if s.variables.temp.is_match(trimmed) {
        LineKind::TempVar
    } else if s.variables.mutation.is_match(trimmed) {
        LineKind::Mutation
    } else if s.conditionals.open.is_match(trimmed) {
        LineKind::ConditionalOpener
    } else if s.sequences.opener(trimmed).is_some() {
        LineKind::SequenceOpener
    } else if is_choice_line(trimmed, syntax) {
        LineKind::Choice
    } else {
        LineKind::Text
    }
}

/// Output for a single-line kind. Block kinds and blank lines are handled
/// by the caller.
fn translate_line(kind: LineKind, trimmed: &str) -> Option<String> {
    let s = schema();
    match kind {
        LineKind::Comment => s.structure.comment.apply(trimmed),
        LineKind::Stitch => s.structure.stitch.apply(trimmed),
        LineKind::Heading => s.structure.heading.apply(trimmed),
        LineKind::Navigation => s.navigation.translate(trimmed),
        LineKind::NamedGather => s.gathers.named.apply(trimmed),
        LineKind::Gather => s.gathers.basic.apply(trimmed),
        LineKind::TempVar => s.variables.temp.apply(trimmed),
        LineKind::Mutation => s.variables.mutation.apply(trimmed),
        LineKind::Text => Some(substitute_inline(trimmed)),
        LineKind::Blank
        | LineKind::ConditionalOpener
        | LineKind::SequenceOpener
        | LineKind::Choice => None,
    }
}

/// Transpile a body into script lines.
///
/// Never fails: every line ends up either in a block, a single-line rule,
/// or passed through with inline substitution. Line numbers in warnings are
/// 1-based positions within `lines`.
pub fn transpile_body<L: AsRef<str>>(lines: &[L], options: &TranspileOptions) -> BodyOutput {
    let mut out = BodyOutput::default();
    let mut i = 0;

    while let Some(line) = lines.get(i) {
        let trimmed = line.as_ref().trim();
        let kind = classify(trimmed, options.choice_syntax);
        log::trace!("line {}: {:?}", i + 1, kind);

        if kind.is_block() {
            let block = match kind {
                LineKind::ConditionalOpener => parse_conditional_block(lines, i),
                LineKind::SequenceOpener => match parse_sequence_block(lines, i) {
                    Some(block) => block,
                    None => BlockOutput {
                        lines: vec![substitute_inline(trimmed)],
                        next: i + 1,
                        warnings: Vec::new(),
                    },
                },
                _ => parse_choice_block(lines, i, options),
            };
            out.lines.extend(block.lines);
            out.warnings.extend(block.warnings);
            i = block.next.max(i + 1);
            continue;
        }

        match translate_line(kind, trimmed) {
            Some(emitted) => {
                if kind == LineKind::Stitch && emitted.trim_end() == "=" {
                    out.warnings
                        .push(format!("line {}: sub-section heading has no identifier", i + 1));
                }
                out.lines.push(emitted);
            }
            None => out.lines.push(String::new()),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> BodyOutput {
        transpile_body(lines, &TranspileOptions::default())
    }

    #[test]
    fn empty_body() {
        let out = run(&[]);
        assert!(out.lines.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn classification_priority() {
        let bq = ChoiceSyntax::Blockquote;
        assert_eq!(classify("", bq), LineKind::Blank);
        assert_eq!(classify("%% note %%", bq), LineKind::Comment);
        assert_eq!(classify("## Pool", bq), LineKind::Stitch);
        assert_eq!(classify("### Pool", bq), LineKind::Heading);
        assert_eq!(classify("-> END", bq), LineKind::Navigation);
        assert_eq!(classify("-> [[Cave#Pool]]", bq), LineKind::Navigation);
        assert_eq!(classify("--- `script: (meet)`", bq), LineKind::NamedGather);
        assert_eq!(classify("----", bq), LineKind::Gather);
        assert_eq!(classify("`script: ~ temp x = 1`", bq), LineKind::TempVar);
        assert_eq!(classify("`script: ~ x = 1`", bq), LineKind::Mutation);
        assert_eq!(classify("> [!script-if] x", bq), LineKind::ConditionalOpener);
        assert_eq!(classify("> [!script-once]", bq), LineKind::SequenceOpener);
        assert_eq!(classify("> - Go", bq), LineKind::Choice);
        assert_eq!(classify("* Go", bq), LineKind::Text);
        assert_eq!(classify("* Go", ChoiceSyntax::Asterisk), LineKind::Choice);
        assert_eq!(classify("#script/tag", bq), LineKind::Text);
    }

    #[test]
    fn single_line_rules() {
        let out = run(&[
            "## The Pool",
            "# Title",
            "%% remember %%",
            "-> [[Cave]]",
            "-> [[Cave#Entrance]]",
            "-> [[#Deep Pool]]",
            "\u{2192} DONE",
            "---",
            "--- `script: (regroup)`",
            "`script: ~ temp roll = 3`",
            "`script: ~ gold -= 1`",
        ]);
        assert_eq!(
            out.lines,
            vec![
                "= the_pool",
                "// Title",
                "// remember",
                "-> cave",
                "-> cave.entrance",
                "-> deep_pool",
                "-> DONE",
                "-",
                "- (regroup)",
                "~ temp roll = 3",
                "~ gold -= 1",
            ]
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn blank_lines_preserved() {
        let out = run(&["One", "", "   ", "Two"]);
        assert_eq!(out.lines, vec!["One", "", "", "Two"]);
    }

    #[test]
    fn text_gets_inline_substitution() {
        let out = run(&["  You have `script: {gold}` coins. #script/hud  "]);
        assert_eq!(out.lines, vec!["You have {gold} coins. # hud"]);
    }

    #[test]
    fn blocks_are_dispatched() {
        let out = run(&[
            "The cave mouth yawns.",
            "> [!script-cycle]",
            "> Drip.",
            "> Drop.",
            "> [!script-if] torch",
            "> You see a path.",
            "> [!script-else]",
            "> It is dark.",
            "",
            "> - Enter [[Cave]]",
            "> + Wait",
            "> -> END",
        ]);
        assert_eq!(
            out.lines,
            vec![
                "The cave mouth yawns.",
                "{&Drip. | Drop.}",
                "{torch:",
                "  You see a path.",
                "- else:",
                "  It is dark.",
                "}",
                "",
                "* [Enter] -> cave",
                "+ [Wait]",
                "  -> END",
            ]
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn asterisk_mode_leaves_quotes_alone() {
        let options = TranspileOptions::new(ChoiceSyntax::Asterisk);
        let out = transpile_body(&["> - not a choice", "* Choice [[Forest]]"], &options);
        assert_eq!(out.lines, vec!["> - not a choice", "* [Choice] -> forest"]);
    }

    #[test]
    fn warnings_collected_in_order() {
        let out = run(&["## !!!", "> [!script-shuffle]", "", "> - `script: (x)`"]);
        assert_eq!(
            out.warnings,
            vec![
                "line 1: sub-section heading has no identifier",
                "line 2: shuffle callout has no items",
                "line 4: choice has no display text",
            ]
        );
    }

    #[test]
    fn works_with_owned_lines() {
        let lines = vec!["-> [[Vault]]".to_string()];
        let out = transpile_body(&lines, &TranspileOptions::default());
        assert_eq!(out.lines, vec!["-> vault"]);
    }
}
