/// Choice sub-parser: one top-level choice and its continuation lines.

use crate::core::inline::substitute_inline;
use crate::core::translation::{schema, CALLOUT_PREFIX};
use crate::core::BlockOutput;
use crate::schema::options::{ChoiceSyntax, TranspileOptions};

/// A line that continues the current choice, with its quote markers or
/// indentation removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Continuation<'a> {
    content: &'a str,
    /// Nesting level a choice on this line would have.
    level: usize,
}

/// Split a top-level choice line into `(sticky, text)`.
pub fn choice_start(trimmed: &str, syntax: ChoiceSyntax) -> Option<(bool, &str)> {
    let (basic, sticky) = schema().choices.markers(syntax);
    if let Some(text) = trimmed.strip_prefix(basic) {
        Some((false, text))
    } else {
        trimmed.strip_prefix(sticky).map(|text| (true, text))
    }
}

/// True when `trimmed` opens a choice under `syntax`.
pub fn is_choice_line(trimmed: &str, syntax: ChoiceSyntax) -> bool {
    choice_start(trimmed, syntax).is_some()
}

fn nested_start(content: &str, syntax: ChoiceSyntax) -> Option<(bool, &str)> {
    let (basic, sticky) = schema().choices.nested_markers(syntax);
    if let Some(text) = content.strip_prefix(basic) {
        Some((false, text))
    } else {
        content.strip_prefix(sticky).map(|text| (true, text))
    }
}

fn indent_width(text: &str) -> usize {
    text.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum()
}

fn continuation(line: &str, syntax: ChoiceSyntax) -> Option<Continuation<'_>> {
    match syntax {
        ChoiceSyntax::Blockquote => {
            let trimmed = line.trim();
            if is_choice_line(trimmed, syntax) || trimmed.starts_with(CALLOUT_PREFIX) {
                return None;
            }
            let mut rest = trimmed.strip_prefix('>')?;
            let mut extra_markers = 0;
            while let Some(inner) = rest.trim_start().strip_prefix('>') {
                extra_markers += 1;
                rest = inner;
            }
            let level = if extra_markers > 0 {
                extra_markers
            } else {
                (indent_width(rest).saturating_sub(1) / 2).max(1)
            };
            Some(Continuation {
                content: rest.trim(),
                level,
            })
        }
        ChoiceSyntax::Asterisk => {
            let width = indent_width(line);
            let content = line.trim();
            if width < 2 || content.is_empty() {
                return None;
            }
            Some(Continuation {
                content,
                level: (width / 2).max(1),
            })
        }
    }
}

/// Translate the text of one choice (markers already removed).
///
/// Decorations are tried left to right and short-circuit: a leading
/// fallback marker wins outright, then an inline condition is extracted,
/// then a trailing link becomes the divert target.
fn translate_choice(
    text: &str,
    sticky: bool,
    level: usize,
    line_no: usize,
    warnings: &mut Vec<String>,
) -> String {
    let s = schema();
    let prefix = s.choices.prefix(level, sticky);
    let mut text = text.trim().to_string();

    if let Some(marker) = s.choices.fallback.find(&text) {
        return s.choices.fallback_choice(&prefix, text[marker.end()..].trim());
    }

    let mut condition = None;
    let stripped = s.choices.condition.captures(&text).map(|caps| {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let cond = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let rest = format!("{}{}", &text[..whole.start], &text[whole.end..]);
        (cond, rest.trim().to_string())
    });
    if let Some((cond, rest)) = stripped {
        condition = Some(cond);
        text = rest;
    }

    let mut target = None;
    let linked = s.choices.link.captures(&text).map(|caps| {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let raw_target = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let alias = caps.get(2).map(|m| m.as_str().trim().to_string());
        let visible = s
            .choices
            .trailing_arrow
            .replace(text[..whole.start].trim(), "")
            .trim()
            .to_string();
        (raw_target, alias, visible)
    });
    if let Some((raw_target, alias, visible)) = linked {
        target = Some(s.navigation.resolve_target(&raw_target));
        text = if !visible.is_empty() {
            visible
        } else {
            alias.unwrap_or(raw_target)
        };
    }

    if text.is_empty() {
        warnings.push(format!("line {line_no}: choice has no display text"));
    }
    s.choices
        .choice(&prefix, condition.as_deref(), &text, target.as_deref())
}

/// Parse the choice starting at `start` plus its continuation lines.
///
/// Blockquote syntax continues with `>` lines that are neither new
/// choices nor callouts; asterisk syntax continues with lines indented by
/// at least two columns. A continuation is a nested choice, a divert,
/// END/DONE, or plain text; everything but nested choices is indented by
/// two spaces. The blank or foreign line that ends the block is not
/// consumed.
pub fn parse_choice_block<L: AsRef<str>>(
    lines: &[L],
    start: usize,
    options: &TranspileOptions,
) -> BlockOutput {
    let s = schema();
    let syntax = options.choice_syntax;
    let mut out = BlockOutput {
        next: start + 1,
        ..BlockOutput::default()
    };

    let Some(first) = lines.get(start).map(|l| l.as_ref().trim()) else {
        return out;
    };
    let Some((sticky, text)) = choice_start(first, syntax) else {
        out.lines.push(substitute_inline(first));
        return out;
    };
    out.lines
        .push(translate_choice(text, sticky, 0, start + 1, &mut out.warnings));

    let mut i = start + 1;
    while let Some(line) = lines.get(i) {
        let line = line.as_ref();
        if line.trim().is_empty() {
            break;
        }
        let Some(cont) = continuation(line, syntax) else {
            break;
        };

        if let Some((sticky, text)) = nested_start(cont.content, syntax) {
            out.lines.push(translate_choice(
                text,
                sticky,
                cont.level,
                i + 1,
                &mut out.warnings,
            ));
        } else if let Some(nav) = s.navigation.translate(cont.content) {
            out.lines.push(format!("  {nav}"));
        } else if cont.content.is_empty() {
            out.lines.push(String::new());
        } else {
            out.lines
                .push(format!("  {}", substitute_inline(cont.content)));
        }
        i += 1;
    }

    out.next = i;
    out
}
