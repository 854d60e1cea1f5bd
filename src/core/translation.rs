/// Translation schema: the table of Markdown constructs and the script
/// text each one becomes.
///
/// Built once on first use and never mutated. Every other module reads
/// its patterns and builders from here, so a notation change is a change
/// to this file only.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::core::normalize::normalize;
use crate::schema::options::ChoiceSyntax;
use crate::schema::value::MetaValue;

/// Namespace of inline code spans (`` `script: ...` ``), inline tags
/// (`#script/name`) and callout types (`> [!script-if]`).
pub const NAMESPACE: &str = "script";

/// Start of any callout opener line.
pub const CALLOUT_PREFIX: &str = "> [!";

/// Start of a quoted (blockquote) line.
pub const QUOTE_PREFIX: &str = "> ";

/// ASCII `->` or Unicode `→`.
const ARROW: &str = r"(?:->|\x{2192})";

/// Expand the `@NS` and `@ARROW` placeholders of a schema pattern.
fn pattern(template: &str) -> Regex {
    let source = template.replace("@NS", NAMESPACE).replace("@ARROW", ARROW);
    Regex::new(&source).expect("valid schema pattern")
}

/// Capture group `i` as text, or `""` when it did not participate.
fn cap<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

/// A schema entry: a pattern and the builder applied to its captures.
pub struct PatternRule {
    pattern: Regex,
    build: fn(&Captures<'_>) -> String,
}

impl PatternRule {
    fn new(template: &str, build: fn(&Captures<'_>) -> String) -> Self {
        Self {
            pattern: pattern(template),
            build,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Build the output for the first match in `text`, if any.
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern.captures(text).map(|caps| (self.build)(&caps))
    }

    /// Replace every match in `text` with its built output.
    pub fn replace_all<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| (self.build)(caps))
    }
}

// === STRUCTURE ===

pub struct Structure {
    /// `## Heading` → `= heading`
    pub stitch: PatternRule,
    /// Any other `#`..`######` heading → `// Heading`
    pub heading: PatternRule,
    /// Full-line `%%text%%` → `// text`
    pub comment: PatternRule,
}

impl Structure {
    pub fn knot(&self, id: &str) -> String {
        format!("=== {id}")
    }

    pub fn stitch_header(&self, id: &str) -> String {
        format!("= {id}")
    }
}

// === NAVIGATION ===

pub struct Navigation {
    pub end: PatternRule,
    pub done: PatternRule,
    /// `-> [[Target#Section]]`
    pub divert_to_section: PatternRule,
    /// `-> [[#Section]]`
    pub divert_to_local_section: PatternRule,
    /// `-> [[Target]]`
    pub divert: PatternRule,
}

impl Navigation {
    /// Translate a full navigation line, checking END/DONE, section
    /// diverts, local section diverts and plain diverts in that order.
    pub fn translate(&self, text: &str) -> Option<String> {
        [
            &self.end,
            &self.done,
            &self.divert_to_section,
            &self.divert_to_local_section,
            &self.divert,
        ]
        .into_iter()
        .find_map(|rule| rule.apply(text))
    }

    /// Address of a wiki-link target: `Target`, `Target#Section` or
    /// `#Section`.
    pub fn resolve_target(&self, target: &str) -> String {
        match target.split_once('#') {
            Some((knot, section)) if knot.trim().is_empty() => normalize(section),
            Some((knot, section)) => format!("{}.{}", normalize(knot), normalize(section)),
            None => normalize(target),
        }
    }

    pub fn divert_to(&self, address: &str) -> String {
        format!("-> {address}")
    }
}

// === GATHERS ===

pub struct Gathers {
    /// `---` to `-----` → `-`
    pub basic: PatternRule,
    /// ``--- `script: (label)` `` → `- (label)`
    pub named: PatternRule,
}

// === VARIABLES ===

pub struct Variables {
    /// `` `script: ~ temp x = expr` `` as a full line
    pub temp: PatternRule,
    /// `` `script: ~ expr` `` as a full line
    pub mutation: PatternRule,
}

impl Variables {
    /// `VAR name = value`. Strings are quoted, arrays become list
    /// literals. `None` for values the script cannot express.
    pub fn global(&self, name: &str, value: &MetaValue) -> Option<String> {
        var_literal(value).map(|v| format!("VAR {name} = {v}"))
    }

    /// `CONST name = value`. Only scalars are allowed.
    pub fn constant(&self, name: &str, value: &MetaValue) -> Option<String> {
        scalar_literal(value).map(|v| format!("CONST {name} = {v}"))
    }

    /// `VAR <object>_<field> = value`.
    pub fn object_field(&self, object_id: &str, field: &str, value: &MetaValue) -> Option<String> {
        self.global(&format!("{object_id}_{field}"), value)
    }
}

fn scalar_literal(value: &MetaValue) -> Option<String> {
    match value {
        MetaValue::String(s) => Some(format!("\"{s}\"")),
        other => other.scalar_text(),
    }
}

fn var_literal(value: &MetaValue) -> Option<String> {
    match value {
        MetaValue::Array(items) => {
            let items: Option<Vec<String>> = items.iter().map(MetaValue::scalar_text).collect();
            items.map(|items| format!("({})", items.join(", ")))
        }
        other => scalar_literal(other),
    }
}

// === CHOICES ===

pub struct Choices {
    /// Leading `` `script: fallback` ``
    pub fallback: Regex,
    /// `` `script: (condition)` `` anywhere in the text
    pub condition: Regex,
    /// Trailing `[[Target]]` or `[[Target|Alias]]`
    pub link: Regex,
    /// Arrow left dangling at the end of display text
    pub trailing_arrow: Regex,
}

impl Choices {
    /// Markers that open a top-level `(non-sticky, sticky)` choice.
    pub fn markers(&self, syntax: ChoiceSyntax) -> (&'static str, &'static str) {
        match syntax {
            ChoiceSyntax::Blockquote => ("> - ", "> + "),
            ChoiceSyntax::Asterisk => ("* ", "+ "),
        }
    }

    /// Markers that open a nested choice once the quote or indentation
    /// has been stripped.
    pub fn nested_markers(&self, syntax: ChoiceSyntax) -> (&'static str, &'static str) {
        match syntax {
            ChoiceSyntax::Blockquote => ("- ", "+ "),
            ChoiceSyntax::Asterisk => ("* ", "+ "),
        }
    }

    /// `*`/`+` repeated `level + 1` times, then a space.
    pub fn prefix(&self, level: usize, sticky: bool) -> String {
        let ch = if sticky { "+" } else { "*" };
        format!("{} ", ch.repeat(level + 1))
    }

    pub fn choice(
        &self,
        prefix: &str,
        condition: Option<&str>,
        text: &str,
        target: Option<&str>,
    ) -> String {
        let mut out = String::from(prefix);
        if let Some(condition) = condition {
            out.push_str(&format!("({condition}) "));
        }
        out.push_str(&format!("[{text}]"));
        if let Some(target) = target {
            out.push_str(&format!(" -> {target}"));
        }
        out
    }

    pub fn fallback_choice(&self, prefix: &str, text: &str) -> String {
        if text.is_empty() {
            format!("{prefix}->")
        } else {
            format!("{prefix}[{text}] ->")
        }
    }
}

// === CONDITIONALS ===

pub struct Conditionals {
    /// `> [!script-if] cond` → `{cond:`
    pub open: PatternRule,
    /// `> [!script-elif] cond` → `- cond:`
    pub elif: PatternRule,
    /// `> [!script-else]` → `- else:`
    pub otherwise: PatternRule,
    /// `` `script: {cond: a|b}` `` → `{cond: a | b}`
    pub inline: PatternRule,
}

impl Conditionals {
    pub fn close(&self) -> &'static str {
        "}"
    }
}

// === SEQUENCES ===

/// The four randomized/ordered sequence callouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Sequence,
    Cycle,
    Shuffle,
    Once,
}

impl SequenceKind {
    pub const ALL: [SequenceKind; 4] = [Self::Sequence, Self::Cycle, Self::Shuffle, Self::Once];

    /// Callout type after the namespace, as in `> [!script-cycle]`.
    pub fn callout_type(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Cycle => "cycle",
            Self::Shuffle => "shuffle",
            Self::Once => "once",
        }
    }

    pub fn sigil(self) -> &'static str {
        match self {
            Self::Sequence => "",
            Self::Cycle => "&",
            Self::Shuffle => "~",
            Self::Once => "!",
        }
    }

    fn from_callout_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.callout_type() == name)
    }
}

pub struct Sequences {
    opener: Regex,
}

impl Sequences {
    /// Sequence kind opened by `line`, if it is a sequence callout.
    pub fn opener(&self, line: &str) -> Option<SequenceKind> {
        self.opener
            .captures(line)
            .and_then(|caps| SequenceKind::from_callout_type(cap(&caps, 1)))
    }

    /// `{<sigil>item1 | item2 | ...}`
    pub fn sequence(&self, kind: SequenceKind, items: &[String]) -> String {
        format!("{{{}{}}}", kind.sigil(), items.join(" | "))
    }
}

// === TAGS ===

pub struct Tags {
    /// `#script/name` → `# name`
    pub inline: PatternRule,
}

impl Tags {
    pub fn unit(&self, tag: &str) -> String {
        format!("# {tag}")
    }
}

// === INLINE SPANS ===

pub struct InlineSpans {
    /// `` `script: ~ expr` `` → `~ expr`
    pub mutation: PatternRule,
    /// `` `script: expr` `` → `expr`
    pub code: PatternRule,
    /// `%%text%%` → `// text`
    pub comment: PatternRule,
}

// === LISTS ===

pub struct Lists;

impl Lists {
    pub fn declaration(&self, name: &str, values: &[String]) -> String {
        format!("LIST {name} = {}", values.join(", "))
    }
}

/// The complete schema, grouped by category.
pub struct TranslationSchema {
    pub structure: Structure,
    pub navigation: Navigation,
    pub gathers: Gathers,
    pub variables: Variables,
    pub choices: Choices,
    pub conditionals: Conditionals,
    pub sequences: Sequences,
    pub tags: Tags,
    pub inline: InlineSpans,
    pub lists: Lists,
}

static SCHEMA: Lazy<TranslationSchema> = Lazy::new(TranslationSchema::build);

/// The process-wide schema.
pub fn schema() -> &'static TranslationSchema {
    &SCHEMA
}

impl TranslationSchema {
    fn build() -> Self {
        let navigation = Navigation {
            end: PatternRule::new(r"^@ARROW\s*END$", |_| "-> END".to_string()),
            done: PatternRule::new(r"^@ARROW\s*DONE$", |_| "-> DONE".to_string()),
            divert_to_section: PatternRule::new(
                r"^@ARROW\s*\[\[([^\]#]+)#([^\]]+)\]\]\s*$",
                |c| format!("-> {}.{}", normalize(cap(c, 1)), normalize(cap(c, 2))),
            ),
            divert_to_local_section: PatternRule::new(
                r"^@ARROW\s*\[\[#([^\]]+)\]\]\s*$",
                |c| format!("-> {}", normalize(cap(c, 1))),
            ),
            divert: PatternRule::new(r"^@ARROW\s*\[\[([^\]#]+)\]\]\s*$", |c| {
                format!("-> {}", normalize(cap(c, 1)))
            }),
        };

        Self {
            structure: Structure {
                stitch: PatternRule::new(r"^##\s+(.+)$", |c| {
                    format!("= {}", normalize(cap(c, 1)))
                }),
                heading: PatternRule::new(r"^#{1,6}\s+(.*)$", |c| {
                    format!("// {}", cap(c, 1).trim())
                }),
                comment: PatternRule::new(r"^%%(.*)%%$", |c| format!("// {}", cap(c, 1).trim())),
            },
            navigation,
            gathers: Gathers {
                basic: PatternRule::new(r"^-{3,5}$", |_| "-".to_string()),
                named: PatternRule::new(r"^---\s*`@NS:\s*\(([^)]+)\)`\s*$", |c| {
                    format!("- ({})", cap(c, 1))
                }),
            },
            variables: Variables {
                temp: PatternRule::new(r"^`@NS:\s*~\s*temp\s+(\w+)\s*=\s*(.+)`$", |c| {
                    format!("~ temp {} = {}", cap(c, 1), cap(c, 2).trim())
                }),
                mutation: PatternRule::new(r"^`@NS:\s*~\s*(.+)`$", |c| {
                    format!("~ {}", cap(c, 1).trim())
                }),
            },
            choices: Choices {
                fallback: pattern(r"^`@NS:\s*fallback`\s*"),
                condition: pattern(r"`@NS:\s*\(([^)]+)\)`"),
                link: pattern(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]\s*$"),
                trailing_arrow: pattern(r"\s*@ARROW\s*$"),
            },
            conditionals: Conditionals {
                open: PatternRule::new(r"^> \[!@NS-if\](.*)$", |c| {
                    format!("{{{}:", cap(c, 1).trim())
                }),
                elif: PatternRule::new(r"^> \[!@NS-elif\](.*)$", |c| {
                    format!("- {}:", cap(c, 1).trim())
                }),
                otherwise: PatternRule::new(r"^> \[!@NS-else\]", |_| "- else:".to_string()),
                inline: PatternRule::new(r"`@NS:\s*\{([^:]+):\s*([^|]+)\|\s*([^}]+)\}`", |c| {
                    format!(
                        "{{{}: {} | {}}}",
                        cap(c, 1).trim(),
                        cap(c, 2).trim(),
                        cap(c, 3).trim()
                    )
                }),
            },
            sequences: Sequences {
                opener: pattern(r"^> \[!@NS-(sequence|cycle|shuffle|once)\]"),
            },
            tags: Tags {
                inline: PatternRule::new(r"#@NS/(\w+)", |c| format!("# {}", cap(c, 1))),
            },
            inline: InlineSpans {
                mutation: PatternRule::new(r"`@NS:\s*~\s*([^`]+)`", |c| {
                    format!("~ {}", cap(c, 1).trim())
                }),
                code: PatternRule::new(r"`@NS:\s*([^`]+)`", |c| cap(c, 1).trim().to_string()),
                comment: PatternRule::new(r"%%([^%]+)%%", |c| format!("// {}", cap(c, 1).trim())),
            },
            lists: Lists,
        }
    }
}
