//! Narrative Notes: transpiles annotated Markdown story notes into
//! Ink-style narrative script.
//!
//! Notes carry a YAML front-matter block (`type`, `id`, `vars`, ...) and a
//! Markdown body using a small set of conventions: `> - ` choices,
//! `-> [[Target]]` diverts, `> [!script-if]` callouts and `` `script: ...` ``
//! inline code. The transpiler is deterministic and does no I/O; reading
//! notes from disk is left to the `transpile` and `note_linter` tools.

pub mod core;
pub mod schema;
