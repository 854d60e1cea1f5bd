/// Inline element substitution for plain-text lines.

use crate::core::translation::schema;

/// Rewrite the inline constructs of one line:
///
/// - `` `script: {c: a|b}` `` → `{c: a | b}`
/// - `` `script: ~ expr` `` → `~ expr`
/// - `` `script: expr` `` → `expr`
/// - `#script/tag` → `# tag`
/// - `%%text%%` → `// text`
///
/// The spans are delimited differently, so all of them can coexist on a
/// single line.
pub fn substitute_inline(line: &str) -> String {
    let s = schema();
    let line = s.conditionals.inline.replace_all(line);
    let line = s.inline.mutation.replace_all(&line);
    let line = s.inline.code.replace_all(&line);
    let line = s.tags.inline.replace_all(&line);
    let line = s.inline.comment.replace_all(&line);
    line.into_owned()
}
